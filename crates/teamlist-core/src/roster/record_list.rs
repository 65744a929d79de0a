use std::fmt;

use tracing::debug;

use crate::models::{Member, SortOrder, NO_SUBTEAM};
use crate::utils::{capitalize_first, contains_ignore_case, eq_ignore_case};

use super::search::{expand_query, MIN_SEARCH_QUERY_LENGTH};

/// Initial capacity of the roster; teams are a few hundred people at most.
const DEFAULT_CAPACITY: usize = 125;

/// A predicate narrowing the filtered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Grade(i32),
    /// Case-insensitive, trimmed. [`NO_SUBTEAM`] selects members without a subteam.
    Subteam(String),
}

impl Filter {
    pub fn matches(&self, member: &Member) -> bool {
        match self {
            Filter::Grade(grade) => member.grade() == *grade,
            Filter::Subteam(subteam) => {
                let wanted = if subteam == NO_SUBTEAM { "" } else { subteam.trim() };
                eq_ignore_case(member.subteam(), wanted)
            }
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Grade(grade) => write!(f, "Grade {}", grade),
            Filter::Subteam(subteam) if subteam == NO_SUBTEAM => write!(f, "No subteam"),
            Filter::Subteam(subteam) => write!(f, "{}", subteam.trim()),
        }
    }
}

/// The roster engine.
///
/// Owns the sorted roster plus two views over it, both stored as roster
/// indices: the filtered view produced by the active filter chain, and the
/// results of the last search.
#[derive(Debug, Clone)]
pub struct RecordList {
    members: Vec<Member>,
    filtered: Vec<usize>,
    filters: Vec<Filter>,
    searched: Vec<usize>,
    sort_order: SortOrder,
}

impl Default for RecordList {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordList {
    pub fn new() -> Self {
        Self::with_sort_order(SortOrder::default())
    }

    pub fn with_sort_order(sort_order: SortOrder) -> Self {
        Self {
            members: Vec::with_capacity(DEFAULT_CAPACITY),
            filtered: Vec::with_capacity(DEFAULT_CAPACITY),
            filters: Vec::new(),
            searched: Vec::new(),
            sort_order,
        }
    }

    // ===== Roster =====

    pub fn get(&self, index: usize) -> Option<&Member> {
        self.members.get(index)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Switch the sort order and re-sort the roster under it.
    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        if self.sort_order != sort_order {
            self.sort_order = sort_order;
            self.sort();
        }
    }

    /// Add a member, keep the roster sorted and reset the filtered view.
    pub fn add_member(&mut self, member: Member) {
        debug!(member = %member, "Adding member");
        self.members.push(member);
        self.sort();
        self.reset_filters();
    }

    /// Delete every member and return to the initial state.
    pub fn clear(&mut self) {
        debug!(count = self.members.len(), "Clearing roster");
        *self = Self::new();
    }

    /// Stable insertion sort of the roster under the active sort order.
    ///
    /// Each element is shifted left past every preceding element whose key
    /// is strictly greater, so members with equal keys keep their relative
    /// order. Active filters are re-applied since roster positions move.
    pub fn sort(&mut self) {
        let order = self.sort_order;
        for i in 1..self.members.len() {
            let key = order.sort_key(&self.members[i]);
            let mut insert_at = i;
            while insert_at > 0 && order.sort_key(&self.members[insert_at - 1]) > key {
                insert_at -= 1;
            }
            self.members[insert_at..=i].rotate_right(1);
        }
        self.refresh_view();
    }

    // ===== Lookup and deletion =====

    /// Binary search for a member sharing `member`'s name under the active
    /// sort order (first name or last name).
    ///
    /// Several members may share the name, so the returned index is not
    /// necessarily `member`'s own.
    pub fn binary_search_member(&self, member: &Member) -> Option<usize> {
        self.binary_search_name(self.sort_order.lookup_name(member))
    }

    /// Binary search the roster by first or last name, per the sort order.
    ///
    /// The query is trimmed and its first character uppercased. A name
    /// equal ignoring case is a hit; otherwise case-sensitive ordering picks
    /// the half to continue in. An empty name never matches.
    pub fn binary_search_name(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let key = capitalize_first(name);

        // Half-open range [low, high)
        let mut low = 0;
        let mut high = self.members.len();
        while low < high {
            // Lower middle of the closed range [low, high - 1]
            let mid = (low + high - 1) / 2;
            let current = self.sort_order.lookup_name(&self.members[mid]).trim();
            if eq_ignore_case(current, &key) {
                return Some(mid);
            }
            if current < key.as_str() {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        None
    }

    /// Delete the first member equal to `member` in all six fields.
    ///
    /// The binary search provides a starting point; if the record there is
    /// not an exact match the roster is probed outward from it, checking the
    /// position after and then the position before at each distance.
    /// Returns whether a member was deleted.
    pub fn delete_member(&mut self, member: &Member) -> bool {
        let Some(start) = self.binary_search_member(member) else {
            debug!(member = %member, "No member with a matching name");
            return false;
        };

        let len = self.members.len();
        let found = if self.members[start] == *member {
            Some(start)
        } else {
            (0..len).find_map(|offset| {
                if start + offset < len && self.members[start + offset] == *member {
                    Some(start + offset)
                } else if offset <= start && self.members[start - offset] == *member {
                    Some(start - offset)
                } else {
                    None
                }
            })
        };

        match found {
            Some(index) => {
                self.remove(index);
                true
            }
            None => {
                debug!(member = %member, "Name matched but no identical member");
                false
            }
        }
    }

    /// Delete the member at roster position `index`.
    pub fn delete_at(&mut self, index: usize) -> bool {
        if index < self.members.len() {
            self.remove(index);
            true
        } else {
            false
        }
    }

    fn remove(&mut self, index: usize) {
        let removed = self.members.remove(index);
        debug!(member = %removed, index, "Deleted member");
        self.refresh_view();
    }

    // ===== Filtering =====

    /// Narrow the filtered view to members in `grade`.
    pub fn filter_by_grade(&mut self, grade: i32) {
        self.apply_filter(Filter::Grade(grade));
    }

    /// Narrow the filtered view to members of `subteam`.
    pub fn filter_by_subteam(&mut self, subteam: &str) {
        self.apply_filter(Filter::Subteam(subteam.to_string()));
    }

    /// Narrow the current filtered view (not the whole roster) by `filter`,
    /// so successive filters intersect.
    pub fn apply_filter(&mut self, filter: Filter) {
        let members = &self.members;
        self.filtered.retain(|&index| filter.matches(&members[index]));
        debug!(filter = %filter, remaining = self.filtered.len(), "Applied filter");
        self.filters.push(filter);
    }

    /// Drop all filters; the view becomes the whole roster.
    pub fn reset_filters(&mut self) {
        self.filters.clear();
        self.filtered = (0..self.members.len()).collect();
    }

    pub fn active_filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Roster positions of the filtered members, in roster order.
    pub fn filtered_index(&self) -> &[usize] {
        &self.filtered
    }

    pub fn filtered_members(&self) -> Vec<&Member> {
        self.filtered.iter().map(|&index| &self.members[index]).collect()
    }

    /// Filtered members paired with their roster positions.
    pub fn filtered_entries(&self) -> impl Iterator<Item = (usize, &Member)> + '_ {
        self.filtered.iter().map(|&index| (index, &self.members[index]))
    }

    /// Rebuild the filtered view from the roster by re-running the active
    /// filter chain, and drop search results that may point at moved rows.
    fn refresh_view(&mut self) {
        let members = &self.members;
        let filters = &self.filters;
        self.filtered = (0..members.len())
            .filter(|&index| filters.iter().all(|filter| filter.matches(&members[index])))
            .collect();
        self.searched.clear();
    }

    // ===== Search =====

    /// Search the filtered view for `query`.
    ///
    /// The query is expanded into partial substrings (longest first) and
    /// each is matched case-insensitively against every filtered member's
    /// name, email and event. Members are returned in the order they were
    /// first matched, each at most once. Queries shorter than
    /// [`MIN_SEARCH_QUERY_LENGTH`] return nothing.
    pub fn search(&mut self, query: &str) -> Vec<&Member> {
        self.searched.clear();
        if query.chars().count() < MIN_SEARCH_QUERY_LENGTH {
            return Vec::new();
        }

        for partial in expand_query(query, MIN_SEARCH_QUERY_LENGTH) {
            let needle = partial.to_lowercase();
            for &index in &self.filtered {
                if contains_ignore_case(&self.members[index].search_string(), &needle)
                    && !self.searched.contains(&index)
                {
                    self.searched.push(index);
                }
            }
        }

        debug!(query, found = self.searched.len(), "Searched roster");
        self.searched.iter().map(|&index| &self.members[index]).collect()
    }

    /// Results of the last search paired with their roster positions.
    pub fn search_results(&self) -> impl Iterator<Item = (usize, &Member)> + '_ {
        self.searched.iter().map(|&index| (index, &self.members[index]))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Member {
        Member::new("Alice", "Smith", "a@x.com", 10, "Finance", "BFS")
    }

    fn bob() -> Member {
        Member::new("Bob", "Jones", "b@x.com", 11, "Marketing", "FTDM")
    }

    fn amy() -> Member {
        Member::new("Amy", "Young", "a2@x.com", 9, "", "")
    }

    fn team() -> RecordList {
        let mut list = RecordList::new();
        list.add_member(bob());
        list.add_member(amy());
        list.add_member(alice());
        list
    }

    fn first_names(members: &[&Member]) -> Vec<String> {
        members.iter().map(|m| m.first_name().to_string()).collect()
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_keeps_roster_sorted_by_first_name() {
        let list = team();
        let names: Vec<&str> = list.members().iter().map(|m| m.first_name()).collect();
        assert_eq!(names, vec!["Alice", "Amy", "Bob"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_set_sort_order_resorts_by_last_name() {
        let mut list = team();
        list.set_sort_order(SortOrder::LastName);
        let names: Vec<&str> = list.members().iter().map(|m| m.last_name()).collect();
        assert_eq!(names, vec!["Jones", "Smith", "Young"]);
        assert_eq!(list.filtered_index(), &[0, 1, 2]);
    }

    #[test]
    fn test_sort_is_case_sensitive() {
        let mut list = RecordList::new();
        list.add_member(Member::named("bob", "Lower"));
        list.add_member(Member::named("Zed", "Upper"));
        let names: Vec<&str> = list.members().iter().map(|m| m.first_name()).collect();
        assert_eq!(names, vec!["Zed", "bob"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_names() {
        let mut list = RecordList::new();
        let first = Member::new("Sam", "Lee", "one@x.com", 9, "", "");
        let second = Member::new("Sam", "Lee", "two@x.com", 12, "", "");
        list.add_member(first.clone());
        list.add_member(second.clone());
        list.sort();
        assert_eq!(list.members(), &[first, second]);
    }

    // -------------------------------------------------------------------------
    // Binary search and deletion
    // -------------------------------------------------------------------------

    #[test]
    fn test_binary_search_name_capitalizes_query() {
        let list = team();
        assert_eq!(list.binary_search_name("  amy "), Some(1));
        assert_eq!(list.binary_search_name("Bob"), Some(2));
        assert_eq!(list.binary_search_name("Carl"), None);
    }

    #[test]
    fn test_binary_search_empty_name_is_no_match() {
        let list = team();
        assert_eq!(list.binary_search_name(""), None);
        assert_eq!(list.binary_search_name("   "), None);
        assert_eq!(RecordList::new().binary_search_name("Alice"), None);
    }

    #[test]
    fn test_binary_search_uses_last_name_when_sorted_by_last_name() {
        let mut list = team();
        list.set_sort_order(SortOrder::LastName);
        assert_eq!(list.binary_search_member(&Member::named("", "young")), Some(2));
        assert_eq!(list.binary_search_member(&Member::named("Amy", "")), None);
    }

    #[test]
    fn test_delete_member_exact_match() {
        let mut list = team();
        assert!(list.delete_member(&amy()));
        assert_eq!(list.len(), 2);
        assert!(!list.members().contains(&amy()));
    }

    #[test]
    fn test_delete_member_probes_past_same_name() {
        let mut list = RecordList::new();
        for email in ["1@x.com", "2@x.com", "3@x.com", "4@x.com", "5@x.com"] {
            list.add_member(Member::new("Sam", "Lee", email, 10, "", ""));
        }
        // The binary search lands in the middle; both neighbours must be reachable
        let first = Member::new("Sam", "Lee", "1@x.com", 10, "", "");
        let last = Member::new("Sam", "Lee", "5@x.com", 10, "", "");
        assert!(list.delete_member(&first));
        assert!(list.delete_member(&last));
        assert_eq!(list.len(), 3);
        assert!(!list.members().contains(&first));
        assert!(!list.members().contains(&last));
    }

    #[test]
    fn test_delete_member_missing_returns_false() {
        let mut list = team();
        let before = list.members().to_vec();

        assert!(!list.delete_member(&Member::named("Carl", "Nobody")));
        // Same name, different grade
        let mut other = alice();
        other.set_grade(12);
        assert!(!list.delete_member(&other));

        assert_eq!(list.members(), before.as_slice());
    }

    #[test]
    fn test_delete_member_with_empty_name_returns_false() {
        let mut list = team();
        list.add_member(Member::default());
        assert!(!list.delete_member(&Member::default()));
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_delete_at() {
        let mut list = team();
        assert!(list.delete_at(0));
        assert_eq!(list.get(0), Some(&amy()));
        assert!(!list.delete_at(2));
        assert!(!list.delete_at(usize::MAX));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_delete_keeps_filters_applied() {
        let mut list = team();
        list.add_member(Member::new("Zoe", "Park", "z@x.com", 10, "Writtens", ""));
        list.filter_by_grade(10);
        assert_eq!(list.filtered_index(), &[0, 3]);

        assert!(list.delete_member(&amy()));
        assert_eq!(list.filtered_index(), &[0, 2]);
        assert_eq!(first_names(&list.filtered_members()), vec!["Alice", "Zoe"]);
        assert_eq!(list.active_filters(), &[Filter::Grade(10)]);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut list = team();
        list.set_sort_order(SortOrder::LastName);
        list.filter_by_grade(10);
        list.clear();
        assert!(list.is_empty());
        assert!(list.filtered_index().is_empty());
        assert!(list.active_filters().is_empty());
        assert_eq!(list.sort_order(), SortOrder::FirstName);
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    #[test]
    fn test_filter_by_grade() {
        let mut list = team();
        list.filter_by_grade(10);
        assert_eq!(first_names(&list.filtered_members()), vec!["Alice"]);
        assert_eq!(list.filtered_index(), &[0]);
    }

    #[test]
    fn test_filter_by_subteam_ignores_case_and_whitespace() {
        let mut list = team();
        list.filter_by_subteam("  marketing ");
        assert_eq!(first_names(&list.filtered_members()), vec!["Bob"]);
        assert_eq!(list.filtered_index(), &[2]);
    }

    #[test]
    fn test_filter_by_no_subteam_sentinel() {
        let mut list = team();
        list.filter_by_subteam(NO_SUBTEAM);
        assert_eq!(first_names(&list.filtered_members()), vec!["Amy"]);
    }

    #[test]
    fn test_filters_intersect() {
        let mut list = team();
        list.add_member(Member::new("Zoe", "Park", "z@x.com", 10, "Writtens", ""));
        list.filter_by_grade(10);
        list.filter_by_subteam("Finance");
        assert_eq!(first_names(&list.filtered_members()), vec!["Alice"]);

        list.filter_by_grade(11);
        assert!(list.filtered_members().is_empty());
        assert!(list.filtered_index().is_empty());
    }

    #[test]
    fn test_reset_filters_restores_roster() {
        let mut list = team();
        list.filter_by_grade(9);
        list.reset_filters();
        assert_eq!(list.filtered_index(), &[0, 1, 2]);
        assert_eq!(list.filtered_members().len(), list.len());
        assert!(list.active_filters().is_empty());
    }

    #[test]
    fn test_add_resets_filters() {
        let mut list = team();
        list.filter_by_grade(10);
        list.add_member(Member::named("Carl", "New"));
        assert_eq!(list.filtered_index(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(Filter::Grade(10).to_string(), "Grade 10");
        assert_eq!(Filter::Subteam(" Finance ".to_string()).to_string(), "Finance");
        assert_eq!(Filter::Subteam(NO_SUBTEAM.to_string()).to_string(), "No subteam");
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    #[test]
    fn test_search_short_query_is_empty() {
        let mut list = team();
        assert!(list.search("am").is_empty());
        assert!(list.search("").is_empty());
        assert_eq!(list.search_results().count(), 0);
    }

    #[test]
    fn test_search_full_match() {
        let mut list = team();
        assert_eq!(first_names(&list.search("amy")), vec!["Amy"]);
        assert_eq!(first_names(&list.search("FTDM")), vec!["Bob"]);
    }

    #[test]
    fn test_search_ranks_longer_matches_first() {
        let mut list = RecordList::new();
        list.add_member(Member::named("Carla", "Moss"));
        list.add_member(Member::named("Marla", "Vance"));
        // "carla" matches Carla in full; Marla only through the partial "arla"
        assert_eq!(first_names(&list.search("carla")), vec!["Carla", "Marla"]);
    }

    #[test]
    fn test_search_does_not_duplicate() {
        let mut list = team();
        // Every partial of "smith" matches Alice Smith
        let results = list.search("smith");
        assert_eq!(first_names(&results), vec!["Alice"]);
    }

    #[test]
    fn test_search_only_covers_filtered_view() {
        let mut list = team();
        list.filter_by_grade(11);
        assert!(list.search("amy").is_empty());
        assert_eq!(first_names(&list.search("x.com")), vec!["Bob"]);
    }

    #[test]
    fn test_search_results_carry_roster_index() {
        let mut list = team();
        list.search("young");
        let results: Vec<(usize, Member)> =
            list.search_results().map(|(i, m)| (i, m.clone())).collect();
        assert_eq!(results, vec![(1, amy())]);
    }

    #[test]
    fn test_search_ignores_subteam() {
        let mut list = team();
        assert!(list.search("Finance").is_empty());
    }
}
