use serde::Serialize;
use tracing::debug;

use crate::page::{NodeId, Page};
use crate::utils;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CollectionCount {
    pub owned: i64,
    pub swap: i64,
}

impl CollectionCount {
    pub fn total(&self) -> i64 {
        self.owned.saturating_add(self.swap)
    }
}

fn sum_badges(page: &Page, nodes: &[NodeId]) -> i64 {
    nodes
        .iter()
        .map(|n| {
            let text = page.text_content(*n);
            utils::parse_leading_int(&text).unwrap_or_else(|| {
                debug!(badge = %text.trim(), "ignoring non-numeric quantity badge");
                0
            })
        })
        .fold(0, i64::saturating_add)
}

/// Sums the owned (`collec_q col<id>`) and swap (`collec_q swa<id>`)
/// badges of a collectible.
pub fn tally(page: &Page, coin: u32) -> CollectionCount {
    let owned_class = format!("col{coin}");
    let swap_class = format!("swa{coin}");
    CollectionCount {
        owned: sum_badges(page, &page.with_classes(&["collec_q", &owned_class])),
        swap: sum_badges(page, &page.with_classes(&["collec_q", &swap_class])),
    }
}

fn write_count(page: &mut Page, id: &str, value: i64) {
    if let Some(node) = page.by_id(id) {
        page.set_text(node, &value.to_string());
    }
}

fn set_swap_frame(page: &mut Page, id: &str, swap: i64) {
    if let Some(frame) = page.node_by_id_mut(id) {
        frame.display = Some(if swap > 0 { "inline" } else { "none" }.to_string());
    }
}

/// Recomputes the aggregate counters of `coin` from scratch and writes them
/// to whichever of the owned/swap/total displays exist on the page.
pub fn refresh_collection_count(page: &mut Page, coin: u32) -> CollectionCount {
    let count = tally(page, coin);
    write_count(page, &format!("affichage_qc{coin}"), count.owned);
    write_count(page, &format!("affichage_qe{coin}"), count.swap);
    set_swap_frame(page, &format!("affichage_qe_cadre{coin}"), count.swap);
    write_count(page, &format!("affichage_qt{coin}"), count.total());
    debug!(
        coin,
        owned = count.owned,
        swap = count.swap,
        "collection count refreshed"
    );
    count
}

fn sum_inputs(page: &Page, class: &str) -> i64 {
    page.with_exact_class("input", class)
        .into_iter()
        .filter_map(|n| page.get(n))
        .filter_map(|n| utils::parse_leading_int(&n.value))
        .fold(0, i64::saturating_add)
}

/// Legacy quantity editors: inputs whose class is exactly `qc<type>`
/// (collection) or `qe<type>` (exchange).
pub fn legacy_tally(page: &Page, type_tag: &str) -> CollectionCount {
    CollectionCount {
        owned: sum_inputs(page, &format!("qc{type_tag}")),
        swap: sum_inputs(page, &format!("qe{type_tag}")),
    }
}

pub fn refresh_legacy_count(page: &mut Page, type_tag: &str) -> CollectionCount {
    let count = legacy_tally(page, type_tag);
    write_count(page, &format!("affichage_qc{type_tag}"), count.owned);
    set_swap_frame(page, &format!("affichage_qe_cadre{type_tag}"), count.swap);
    write_count(page, &format!("affichage_qe{type_tag}"), count.swap);
    count
}
