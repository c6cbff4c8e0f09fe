//! Navigation menu model.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Dashboard,
    Users,
    Buses,
    Stops,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Users => "Users",
            Screen::Buses => "Buses",
            Screen::Stops => "Stops",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuGroup {
    pub title: &'static str,
    pub entries: &'static [Screen],
}

pub const NAV_MENU: &[MenuGroup] = &[MenuGroup {
    title: "Routes",
    entries: &[Screen::Users, Screen::Buses, Screen::Stops],
}];

/// Screens linked from the dashboard, in menu order.
pub fn dashboard_links() -> impl Iterator<Item = Screen> {
    NAV_MENU.iter().flat_map(|group| group.entries.iter().copied())
}
