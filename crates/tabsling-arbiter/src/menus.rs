//! Context-menu entries.

use tabsling_config::Settings;
use tabsling_protocols::{ContextMenuRegistry, HostError, MenuContext, MenuEntry};

/// Opens the clicked link or the first URL of the selection.
pub const OPEN_LINK_MENU_ID: &str = "tabsling-open-link";

/// Opens every URL line of the selection.
pub const OPEN_MULTIPLE_MENU_ID: &str = "tabsling-open-multiple";

/// Entries to register for `settings`.
pub fn menu_entries(settings: &Settings) -> Vec<MenuEntry> {
    let mut entries = vec![MenuEntry {
        id: OPEN_LINK_MENU_ID.to_string(),
        title: "Open in new tab".to_string(),
        contexts: vec![MenuContext::Link, MenuContext::Selection],
        visible: true,
    }];
    if settings.multi_url_support {
        entries.push(MenuEntry {
            id: OPEN_MULTIPLE_MENU_ID.to_string(),
            title: "Open all URLs in new tabs".to_string(),
            contexts: vec![MenuContext::Selection],
            visible: false,
        });
    }
    entries
}

/// Replace every registered entry with the ones for `settings`.
pub async fn register_menus(
    registry: &dyn ContextMenuRegistry,
    settings: &Settings,
) -> Result<(), HostError> {
    registry.remove_all().await?;
    for entry in menu_entries(settings) {
        registry.create(entry).await?;
    }
    Ok(())
}

/// Show or hide the entries after a selection check.
pub async fn update_visibility(
    registry: &dyn ContextMenuRegistry,
    show: bool,
    multi_url_support: bool,
) -> Result<(), HostError> {
    registry.set_visible(OPEN_LINK_MENU_ID, show).await?;
    // Not registered without multi-URL support.
    if multi_url_support {
        registry.set_visible(OPEN_MULTIPLE_MENU_ID, show).await?;
    }
    Ok(())
}
