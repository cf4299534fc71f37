pub mod form;
pub mod pictures;
pub mod render;

use crate::config::SiteConfig;
use crate::events::Subscription;
use crate::page::NodeId;

use self::form::{Grade, ModalForm, ModalRequest};
use self::pictures::PictureSet;

/// Radio group that can be cleared by clicking the checked option again.
/// Keeps its own notion of the checked value since a native radio group
/// never reports a click on the option that is already on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GradeToggle {
    checked: Option<Grade>,
}

impl GradeToggle {
    pub fn new(checked: Option<Grade>) -> Self {
        Self { checked }
    }

    pub fn click(&mut self, grade: Grade) -> Option<Grade> {
        self.checked = if self.checked == Some(grade) {
            None
        } else {
            Some(grade)
        };
        self.checked
    }

    pub fn checked(&self) -> Option<Grade> {
        self.checked
    }
}

/// State of the open item form.
#[derive(Debug)]
pub struct Modal {
    pub form: ModalForm,
    pub pictures: PictureSet,
    grade: GradeToggle,
    node: NodeId,
    escape: Subscription,
}

impl Modal {
    pub(crate) fn attach(
        form: ModalForm,
        pictures: PictureSet,
        node: NodeId,
        escape: Subscription,
    ) -> Self {
        Self {
            grade: GradeToggle::new(form.grade),
            form,
            pictures,
            node,
            escape,
        }
    }

    /// Form for the given request, without attaching anything.
    pub fn preview(req: ModalRequest, site: &SiteConfig) -> (ModalForm, PictureSet) {
        let pictures = PictureSet::new(&site.pictures_path(), &site.pictures_url())
            .with_existing(&req.pictures);
        (ModalForm::from_request(req, site), pictures)
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub(crate) fn escape_subscription(&self) -> Subscription {
        self.escape
    }

    pub(crate) fn click_grade(&mut self, grade: Grade) -> Option<Grade> {
        let checked = self.grade.click(grade);
        self.form.grade = checked;
        checked
    }

    pub fn grade(&self) -> Option<Grade> {
        self.grade.checked()
    }
}
