//! Native dialogs: the save-path chooser and modal notifications.

use super::state::{Notice, NoticeLevel};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::path::{Path, PathBuf};

/// Asks where to save, starting from `suggested`.
///
/// Returns `None` if the user cancels.
pub fn pick_save_path(suggested: &Path) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Save Image")
        .add_filter("PNG", &["png"])
        .add_filter("JPEG", &["jpg", "jpeg"])
        .add_filter("All Files", &["*"]);

    if let Some(dir) = suggested.parent() {
        dialog = dialog.set_directory(dir);
    }
    if let Some(name) = suggested.file_name().and_then(|n| n.to_str()) {
        dialog = dialog.set_file_name(name);
    }

    dialog.save_file()
}

/// Shows `notice` in a blocking message box.
pub fn show_notice(notice: &Notice) {
    let level = match notice.level {
        NoticeLevel::Info => MessageLevel::Info,
        NoticeLevel::Warning => MessageLevel::Warning,
        NoticeLevel::Error => MessageLevel::Error,
    };

    MessageDialog::new()
        .set_level(level)
        .set_title(notice.title)
        .set_description(&notice.message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
