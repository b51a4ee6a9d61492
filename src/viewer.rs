//! Shared fullscreen overlay.

use crate::host::Host;

/// Id of the overlay element.
pub const MODAL_ID: &str = "fullscreenModal";
/// Id of the image inside the overlay.
pub const IMAGE_ID: &str = "fullscreenImg";

/// The one fullscreen viewer of a page. Opening replaces whatever was shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    src: Option<String>,
    visible: bool,
}

impl Viewer {
    /// The viewer of a page, if the page carries both overlay elements.
    /// Without them clicks on gallery images do nothing.
    pub fn attach<H: Host>(host: &H) -> Option<Self> {
        if host.has_container(MODAL_ID) && host.has_container(IMAGE_ID) {
            Some(Self::default())
        } else {
            log::debug!("no #{MODAL_ID}/#{IMAGE_ID} on page, fullscreen disabled");
            None
        }
    }

    pub fn open(&mut self, src: &str) {
        log::debug!("opening fullscreen: {src}");
        self.src = Some(src.to_string());
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Source currently loaded into the overlay image, kept after closing.
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::StaticHost;

    #[test]
    fn attach_needs_both_overlay_elements() {
        let host = StaticHost::default().with_ids(&[MODAL_ID, IMAGE_ID]);
        assert_eq!(Viewer::attach(&host), Some(Viewer::default()));

        let modal_only = StaticHost::default().with_ids(&[MODAL_ID]);
        assert_eq!(Viewer::attach(&modal_only), None);
        assert_eq!(Viewer::attach(&StaticHost::default()), None);
    }

    #[test]
    fn open_shows_image() {
        let mut viewer = Viewer::default();
        assert!(!viewer.is_visible());
        viewer.open("/projects/kitchen/a.jpg");
        assert!(viewer.is_visible());
        assert_eq!(viewer.src(), Some("/projects/kitchen/a.jpg"));
    }

    #[test]
    fn second_open_replaces_first() {
        let mut viewer = Viewer::default();
        viewer.open("/projects/kitchen/a.jpg");
        viewer.open("/projects/kitchen/b.jpg");
        assert_eq!(viewer.src(), Some("/projects/kitchen/b.jpg"));
    }

    #[test]
    fn close_hides_overlay() {
        let mut viewer = Viewer::default();
        viewer.open("/projects/kitchen/a.jpg");
        viewer.close();
        assert!(!viewer.is_visible());
    }
}
