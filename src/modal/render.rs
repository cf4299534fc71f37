use maud::{html, Markup};

use super::form::{FormMode, Grade, ModalForm};
use super::pictures::PictureSet;
use crate::config::SiteConfig;
use crate::utils;

pub const UPLOAD_HINT: &str = "Click or drop files here to upload.";

fn version_selector(form: &ModalForm, site: &SiteConfig) -> Markup {
    match site.catalog.versions(form.coin_id) {
        Some(versions) => html! {
            div {
                label for="collec_form_coin" { (form.collectible_type.version_label()) }
                span.form_value {
                    select name="collec_form_coin" id="collec_form_coin" disabled[form.mode == FormMode::Edit] {
                        @if versions.len() > 1 {
                            option value="" selected[form.version.is_none()] { "Undetermined" }
                        }
                        @for version in versions {
                            option value=(version.id) selected[form.version == Some(version.id)] {
                                (version.label())
                            }
                        }
                    }
                }
            }
        },
        None => html! {
            input type="hidden" name="collec_form_coin" id="collec_form_coin"
                value=(form.version.map(|v| v.to_string()).unwrap_or_default());
        },
    }
}

fn grade_selector(form: &ModalForm) -> Markup {
    html! {
        div {
            span.form_name { "Grade:" }
            span.form_value {
                @for grade in Grade::ALL {
                    @let input_id = format!("collec_form_grade_{}", grade.code());
                    input type="radio" name="collec_form_grade" value=(grade.code()) id=(input_id)
                        checked[form.grade == Some(grade)];
                    label for=(input_id) { abbr title=(grade.title()) { (grade.abbr()) } }
                }
            }
        }
    }
}

fn picture_field(pictures: &PictureSet) -> Markup {
    html! {
        div {
            label.collec_form_pictures for="collec_form_pictures" {
                "Pictures or" br; "private PDF documents:"
            }
            span.form_value {
                div style="display:none;" {
                    select multiple name="collec_form_pictures" id="collec_form_pictures" {
                        @for option in pictures.options() {
                            option value=(option.value) selected[option.selected] { (option.value) }
                        }
                    }
                }
                div id="collec_form_dropzone" class="dropzone" style="display:block; position:relative"
                    data-url="/vous/upload_picture.php" data-accept=".jpeg,.jpg,.png,.gif,.pdf" {
                    @for file in pictures.files() {
                        div.dz-preview data-name=(file.name) {
                            @if let Some(thumbnail) = file.thumbnail.as_deref() {
                                img.dz-thumbnail src=(thumbnail) alt=(file.name);
                            }
                            span.dz-filename { (file.name) }
                        }
                    }
                    @if pictures.files().is_empty() {
                        span.dz-message { (UPLOAD_HINT) }
                    }
                }
            }
        }
    }
}

/// Renders the add/edit item form. Every interpolated value goes through
/// maud's escaping; nothing is concatenated by hand.
pub fn render_modal(form: &ModalForm, pictures: &PictureSet, site: &SiteConfig) -> Markup {
    html! {
        section.modal {
            div.modal-content role="dialog" aria-labelledby="modal_title" aria-modal="true" {
                form action="" method="get" {
                    input.close type="button" title="Close" value="\u{d7}";
                    header id="modal_title" { (form.title()) }
                    div id="collec_form" {
                        input type="hidden" name="collec_form_ct" id="collec_form_ct"
                            value=(form.collectible_type.as_str());
                        input type="hidden" name="collec_form_type" id="collec_form_type"
                            value=(form.coin_id);
                        input type="hidden" name="collec_form_item" id="collec_form_item"
                            value=(form.item.map(|i| i.to_string()).unwrap_or_default());
                        (version_selector(form, site))
                        (grade_selector(form))
                        div {
                            label.form_name for="collec_form_quantity" { "Quantity:" }
                            span.form_value {
                                input type="number" name="collec_form_quantity" id="collec_form_quantity"
                                    min="1" value=(form.quantity);
                            }
                        }
                        div {
                            label.form_name for="collec_form_value" { "Buying value (USD):" }
                            span.form_value {
                                input type="number" name="collec_form_value" id="collec_form_value"
                                    step="0.01" min="0" value=[form.value.map(utils::format_amount)];
                            }
                        }
                        div {
                            label.form_name for="collec_form_comment" { "Private comment:" }
                            span.form_value {
                                input type="text" name="collec_form_comment" id="collec_form_comment"
                                    value=(form.comment);
                            }
                        }
                        div {
                            span.form_name { "For exchange:" }
                            span.form_value {
                                input type="radio" name="collec_form_swap" value="1" id="collec_form_swap_yes"
                                    checked[form.for_swap];
                                label for="collec_form_swap_yes" { "yes" }
                                input type="radio" name="collec_form_swap" value="0" id="collec_form_swap_no"
                                    checked[!form.for_swap];
                                label for="collec_form_swap_no" { "no" }
                            }
                        }
                        div {
                            label.form_name for="collec_form_swap_comment" { "Public comment:" }
                            span.form_value {
                                input type="text" name="collec_form_swap_comment" id="collec_form_swap_comment"
                                    value=(form.swap_comment);
                            }
                        }
                        div {
                            label.form_name for="collec_form_section" { "Collection:" }
                            span.form_value {
                                select name="collec_form_section" id="collec_form_section" {
                                    @for section in &site.sections {
                                        option value=(section.id) selected[section.id == form.section] {
                                            (section.label)
                                        }
                                    }
                                }
                            }
                        }
                        (picture_field(pictures))
                    }
                    div.collec_form_submit {
                        input.button type="submit" value="Save" data-add-again="false";
                        @if form.mode == FormMode::Create {
                            input.button.secondary type="button" value="Save and add again"
                                data-add-again="true";
                        }
                    }
                }
            }
        }
    }
}
