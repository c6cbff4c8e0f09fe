//! Paginated listing state shared by every table screen.
//!
//! A [`ListingView`] owns the query for one screen and the rows currently on display. Every
//! control change hands out a [`FetchTicket`] stamped with a fresh generation; only the result
//! carrying the latest generation is committed, and it replaces the visible rows in one step.

use std::ops::RangeInclusive;

use shared::domain::SortOrder;

pub const BUS_PAGE_SIZE: u32 = 10;
pub const CITY_PAGE_SIZE: u32 = 10;
pub const USER_PAGE_SIZE: u32 = 5;
pub const PICKER_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKeyOption {
    pub key: &'static str,
    pub label: &'static str,
}

pub const BUS_SORT_KEYS: &[SortKeyOption] = &[
    SortKeyOption {
        key: "busNumber",
        label: "Sort by Bus Number",
    },
    SortKeyOption {
        key: "busId",
        label: "Sort by BusId",
    },
    SortKeyOption {
        key: "busCapacity",
        label: "Sort by Bus Capacity",
    },
    SortKeyOption {
        key: "earningPerDay",
        label: "Sort by Earning Per Day",
    },
];

pub const CITY_SORT_KEYS: &[SortKeyOption] = &[
    SortKeyOption {
        key: "createdAt",
        label: "Sort by CreatedAt",
    },
    SortKeyOption {
        key: "cityName",
        label: "Sort by City Name",
    },
];

pub const USER_SORT_KEYS: &[SortKeyOption] = &[
    SortKeyOption {
        key: "name",
        label: "Sort by Name",
    },
    SortKeyOption {
        key: "email",
        label: "Sort by Email",
    },
    SortKeyOption {
        key: "phoneNumber",
        label: "Sort by Phone Number",
    },
];

pub fn sort_key_label(options: &[SortKeyOption], key: &str) -> String {
    options
        .iter()
        .find(|option| option.key == key)
        .map(|option| option.label.to_string())
        .unwrap_or_else(|| format!("Sort by {key}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub page: u32,
    pub limit: u32,
    /// Empty means "backend default order" and is not sent.
    pub sort_key: String,
    /// `None` for screens without an order control.
    pub sort_order: Option<SortOrder>,
    /// Whether the screen lets the user flip `sort_order`.
    pub order_toggle: bool,
    pub filter: Option<String>,
}

impl ListingQuery {
    pub fn buses() -> Self {
        Self {
            page: 1,
            limit: BUS_PAGE_SIZE,
            sort_key: "busNumber".to_string(),
            sort_order: Some(SortOrder::Asc),
            order_toggle: true,
            filter: None,
        }
    }

    pub fn cities() -> Self {
        Self {
            page: 1,
            limit: CITY_PAGE_SIZE,
            sort_key: "createdAt".to_string(),
            sort_order: None,
            order_toggle: false,
            filter: None,
        }
    }

    pub fn staff_users() -> Self {
        Self {
            page: 1,
            limit: USER_PAGE_SIZE,
            sort_key: "name".to_string(),
            sort_order: Some(SortOrder::Asc),
            order_toggle: false,
            filter: Some("Staff".to_string()),
        }
    }

    /// First page of users with the given account type, sized for a picker.
    pub fn user_picker(account_type: &str) -> Self {
        Self {
            page: 1,
            limit: PICKER_LIMIT,
            sort_key: "name".to_string(),
            sort_order: None,
            order_toggle: false,
            filter: Some(account_type.to_string()),
        }
    }

    pub fn city_picker() -> Self {
        Self {
            page: 1,
            limit: PICKER_LIMIT,
            sort_key: String::new(),
            sort_order: None,
            order_toggle: false,
            filter: None,
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if !self.sort_key.is_empty() {
            pairs.push(("sort", self.sort_key.clone()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("order", order.as_query_value().to_string()));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: ListingQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingPhase {
    Idle,
    Loading,
    Ready,
    NoData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    Stale,
}

#[derive(Debug, Clone)]
pub struct ListingView<T> {
    query: ListingQuery,
    generation: u64,
    phase: ListingPhase,
    rows: Vec<T>,
    total_pages: u32,
}

impl<T> ListingView<T> {
    pub fn new(query: ListingQuery) -> Self {
        Self {
            query,
            generation: 0,
            phase: ListingPhase::Idle,
            rows: Vec::new(),
            total_pages: 1,
        }
    }

    pub fn query(&self) -> &ListingQuery {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> ListingPhase {
        self.phase
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn current_page(&self) -> u32 {
        self.query.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ListingPhase::Loading
    }

    /// Failure and a successful empty page both render the empty-state message.
    pub fn shows_empty_state(&self) -> bool {
        match self.phase {
            ListingPhase::NoData => true,
            ListingPhase::Ready => self.rows.is_empty(),
            ListingPhase::Idle | ListingPhase::Loading => false,
        }
    }

    pub fn show_pagination(&self) -> bool {
        self.total_pages > 1
    }

    pub fn page_numbers(&self) -> RangeInclusive<u32> {
        1..=self.total_pages
    }

    /// Starts a new fetch cycle for the current query.
    pub fn refresh(&mut self) -> FetchTicket {
        self.generation += 1;
        self.phase = ListingPhase::Loading;
        self.rows.clear();
        FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
        }
    }

    pub fn go_to_page(&mut self, page: u32) -> Option<FetchTicket> {
        if page == 0 || page == self.query.page || page > self.total_pages.max(1) {
            return None;
        }
        self.query.page = page;
        Some(self.refresh())
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if self.query.page >= self.total_pages {
            return None;
        }
        self.go_to_page(self.query.page + 1)
    }

    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        if self.query.page <= 1 {
            return None;
        }
        self.go_to_page(self.query.page - 1)
    }

    pub fn set_sort_key(&mut self, key: &str) -> Option<FetchTicket> {
        if self.query.sort_key == key {
            return None;
        }
        self.query.sort_key = key.to_string();
        Some(self.refresh())
    }

    pub fn toggle_sort_order(&mut self) -> Option<FetchTicket> {
        if !self.query.order_toggle {
            return None;
        }
        let order = self.query.sort_order?;
        self.query.sort_order = Some(order.toggled());
        Some(self.refresh())
    }

    /// Applies a finished fetch if it belongs to the latest generation.
    ///
    /// Rows are replaced wholesale, so the table never mixes two fetch cycles.
    pub fn commit<E>(&mut self, generation: u64, result: Result<Page<T>, E>) -> CommitOutcome {
        if generation != self.generation {
            return CommitOutcome::Stale;
        }
        match result {
            Ok(page) => {
                self.rows = page.items;
                self.total_pages = page.total_pages;
                self.phase = ListingPhase::Ready;
            }
            Err(_) => {
                self.rows.clear();
                self.total_pages = 0;
                self.phase = ListingPhase::NoData;
            }
        }
        CommitOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: &[&'static str], total_pages: u32) -> Result<Page<&'static str>, String> {
        Ok(Page {
            items: items.to_vec(),
            total_pages,
        })
    }

    #[test]
    fn bus_query_sends_sort_and_order() {
        let pairs = ListingQuery::buses().to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "1".to_string()),
                ("limit", "10".to_string()),
                ("sort", "busNumber".to_string()),
                ("order", "asc".to_string()),
            ]
        );
    }

    #[test]
    fn picker_queries_omit_unset_parameters() {
        let pairs = ListingQuery::city_picker().to_query_pairs();
        assert_eq!(
            pairs,
            vec![("page", "1".to_string()), ("limit", "100".to_string())]
        );

        let pairs = ListingQuery::user_picker("Owner").to_query_pairs();
        assert!(pairs.contains(&("filter", "Owner".to_string())));
        assert!(!pairs.iter().any(|(name, _)| *name == "order"));
    }

    #[test]
    fn refresh_enters_loading_and_clears_rows() {
        let mut view = ListingView::new(ListingQuery::cities());
        let ticket = view.refresh();
        assert_eq!(view.commit(ticket.generation, page(&["agra"], 1)), CommitOutcome::Applied);
        assert_eq!(view.rows(), &["agra"]);

        let ticket = view.refresh();
        assert_eq!(ticket.generation, 2);
        assert!(view.is_loading());
        assert!(view.rows().is_empty());
        assert!(!view.shows_empty_state());
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut view = ListingView::new(ListingQuery::buses());
        let first = view.refresh();
        view.commit(first.generation, page(&["a"], 3));

        let slow = view.go_to_page(2).expect("page 2");
        let fast = view.go_to_page(3).expect("page 3");

        assert_eq!(
            view.commit(fast.generation, page(&["page-3"], 3)),
            CommitOutcome::Applied
        );
        assert_eq!(
            view.commit(slow.generation, page(&["page-2"], 3)),
            CommitOutcome::Stale
        );
        assert_eq!(view.rows(), &["page-3"]);
        assert_eq!(view.current_page(), 3);
    }

    #[test]
    fn failure_shows_empty_state_instead_of_spinner() {
        let mut view: ListingView<&str> = ListingView::new(ListingQuery::buses());
        let ticket = view.refresh();
        view.commit(ticket.generation, Err::<Page<&str>, _>("500 Internal Server Error"));
        assert!(!view.is_loading());
        assert_eq!(view.phase(), ListingPhase::NoData);
        assert!(view.shows_empty_state());
    }

    #[test]
    fn empty_page_shows_empty_state() {
        let mut view = ListingView::new(ListingQuery::staff_users());
        let ticket = view.refresh();
        view.commit(ticket.generation, page(&[], 0));
        assert!(view.shows_empty_state());
        assert!(!view.show_pagination());
    }

    #[test]
    fn pagination_hidden_for_single_page() {
        let mut view = ListingView::new(ListingQuery::buses());
        let ticket = view.refresh();
        view.commit(ticket.generation, page(&["a"], 1));
        assert!(!view.show_pagination());

        let ticket = view.refresh();
        view.commit(ticket.generation, page(&["a"], 4));
        assert!(view.show_pagination());
        assert_eq!(view.page_numbers(), 1..=4);
    }

    #[test]
    fn page_navigation_stays_in_bounds() {
        let mut view = ListingView::new(ListingQuery::buses());
        let ticket = view.refresh();
        view.commit(ticket.generation, page(&["a"], 2));

        assert!(view.previous_page().is_none());
        assert!(view.go_to_page(1).is_none());
        assert!(view.go_to_page(5).is_none());

        let ticket = view.next_page().expect("next page");
        assert_eq!(ticket.query.page, 2);
        view.commit(ticket.generation, page(&["b"], 2));
        assert!(view.next_page().is_none());
        assert_eq!(view.previous_page().map(|t| t.query.page), Some(1));
    }

    #[test]
    fn sort_controls_trigger_new_fetch() {
        let mut view: ListingView<&str> = ListingView::new(ListingQuery::buses());
        assert!(view.set_sort_key("busNumber").is_none());

        let ticket = view.set_sort_key("earningPerDay").expect("sort change");
        assert_eq!(ticket.query.sort_key, "earningPerDay");

        let ticket = view.toggle_sort_order().expect("order toggle");
        assert_eq!(ticket.query.sort_order, Some(SortOrder::Desc));

        let mut cities: ListingView<&str> = ListingView::new(ListingQuery::cities());
        assert!(cities.toggle_sort_order().is_none());
    }

    #[test]
    fn users_send_fixed_ascending_order() {
        let mut users: ListingView<&str> = ListingView::new(ListingQuery::staff_users());
        assert!(users.toggle_sort_order().is_none());
        assert_eq!(users.query().sort_order, Some(SortOrder::Asc));
        assert!(users
            .query()
            .to_query_pairs()
            .contains(&("order", "asc".to_string())));
    }

    #[test]
    fn failure_drops_previous_page_count() {
        let mut view: ListingView<&str> = ListingView::new(ListingQuery::buses());
        let ticket = view.refresh();
        view.commit(ticket.generation, page(&["a"], 4));
        assert!(view.show_pagination());

        let ticket = view.next_page().expect("next page");
        view.commit(ticket.generation, Err::<Page<&str>, _>("connection refused"));
        assert!(view.shows_empty_state());
        assert_eq!(view.total_pages(), 0);
        assert!(!view.show_pagination());
    }

    #[test]
    fn labels_known_and_unknown_sort_keys() {
        assert_eq!(sort_key_label(BUS_SORT_KEYS, "busId"), "Sort by BusId");
        assert_eq!(sort_key_label(CITY_SORT_KEYS, "updatedAt"), "Sort by updatedAt");
    }
}
