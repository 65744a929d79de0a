use std::path::PathBuf;

use chrono::{DateTime, Local};
use teamlist_core::models::{GRADES, NO_SUBTEAM};
use teamlist_core::storage;
use teamlist_core::utils::age_display;
use teamlist_core::{Filter, Member, RecordList};
use tracing::{info, warn};

use crate::config::Config;

// ============================================================================
// Constants
// ============================================================================

/// Number of items to scroll when using Page Up/Page Down
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Maximum length for a single form field or prompt
const MAX_FIELD_LENGTH: usize = 64;

/// Maximum length for a file path typed into the import prompt
const MAX_PATH_LENGTH: usize = 512;

/// Check if a character can be added to a form field.
pub fn can_add_field_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && !c.is_control()
}

/// Check if a character can be added to the import path prompt.
pub fn can_add_path_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PATH_LENGTH && !c.is_control()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    AddingMember,
    PickingFilter,
    EnteringImportPath,
    ConfirmingDelete,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Fields of the add-member form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    FirstName,
    LastName,
    Email,
    Grade,
    Subteam,
    EventId,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::Email,
        FormField::Grade,
        FormField::Subteam,
        FormField::EventId,
    ];

    fn position(&self) -> usize {
        match self {
            FormField::FirstName => 0,
            FormField::LastName => 1,
            FormField::Email => 2,
            FormField::Grade => 3,
            FormField::Subteam => 4,
            FormField::EventId => 5,
        }
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::FirstName => "First name",
            FormField::LastName => "Last name",
            FormField::Email => "Email",
            FormField::Grade => "Grade",
            FormField::Subteam => "Subteam",
            FormField::EventId => "Event ID",
        }
    }
}

/// Input buffer for the add-member overlay.
#[derive(Debug, Clone, Default)]
pub struct MemberForm {
    values: [String; 6],
    pub focus: FormField,
    pub error: Option<String>,
}

impl MemberForm {
    pub fn value(&self, field: FormField) -> &str {
        &self.values[field.position()]
    }

    pub fn push_char(&mut self, c: char) {
        let value = &mut self.values[self.focus.position()];
        if can_add_field_char(value.chars().count(), c) {
            value.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        self.values[self.focus.position()].pop();
    }

    /// Build a member from the form. Only the grade can be rejected.
    pub fn to_member(&self) -> Result<Member, String> {
        let grade_text = self.value(FormField::Grade).trim();
        let grade = grade_text
            .parse::<i32>()
            .map_err(|_| format!("Grade must be a number, got `{}`", grade_text))?;
        Ok(Member::new(
            self.value(FormField::FirstName),
            self.value(FormField::LastName),
            self.value(FormField::Email),
            grade,
            self.value(FormField::Subteam),
            self.value(FormField::EventId),
        ))
    }
}

pub struct App {
    pub list: RecordList,
    pub config: Config,
    pub state: AppState,
    pub selection: usize,
    pub search_query: String,
    pub form: MemberForm,
    pub filter_selection: usize,
    pub import_path: String,
    pub status_message: Option<String>,
    /// Roster differs from the storage file
    pub dirty: bool,
    pub last_saved: Option<DateTime<Local>>,
}

impl App {
    pub fn new(config: Config, list: RecordList) -> Self {
        Self {
            list,
            config,
            state: AppState::Normal,
            selection: 0,
            search_query: String::new(),
            form: MemberForm::default(),
            filter_selection: 0,
            import_path: String::new(),
            status_message: None,
            dirty: false,
            last_saved: None,
        }
    }

    // ===== Views =====

    /// Rows currently shown: search results while a query is entered,
    /// otherwise the filtered view. Each row carries its roster position.
    pub fn visible_rows(&self) -> Vec<(usize, &Member)> {
        if self.search_query.is_empty() {
            self.list.filtered_entries().collect()
        } else {
            self.list.search_results().collect()
        }
    }

    pub fn selected_member(&self) -> Option<&Member> {
        self.visible_rows()
            .get(self.selection)
            .map(|(_, member)| *member)
    }

    /// Choices offered by the filter picker: every grade, each configured
    /// subteam, then "no subteam".
    pub fn filter_options(&self) -> Vec<Filter> {
        GRADES
            .iter()
            .map(|&grade| Filter::Grade(grade))
            .chain(self.config.subteams.iter().map(|s| Filter::Subteam(s.clone())))
            .chain(std::iter::once(Filter::Subteam(NO_SUBTEAM.to_string())))
            .collect()
    }

    pub fn saved_display(&self) -> String {
        if self.dirty {
            return "Unsaved changes".to_string();
        }
        match self.last_saved {
            Some(saved_at) => format!("Saved {}", age_display((Local::now() - saved_at).num_minutes())),
            None => "Not saved this session".to_string(),
        }
    }

    /// Drop the last action's message so the save state shows again.
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    // ===== Navigation =====

    fn row_count(&self) -> usize {
        self.visible_rows().len()
    }

    fn clamp_selection(&mut self) {
        let count = self.row_count();
        if self.selection >= count {
            self.selection = count.saturating_sub(1);
        }
    }

    pub fn select_next(&mut self) {
        let count = self.row_count();
        if count > 0 && self.selection + 1 < count {
            self.selection += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    pub fn page_down(&mut self) {
        let count = self.row_count();
        self.selection = (self.selection + PAGE_SCROLL_SIZE).min(count.saturating_sub(1));
    }

    pub fn page_up(&mut self) {
        self.selection = self.selection.saturating_sub(PAGE_SCROLL_SIZE);
    }

    pub fn select_first(&mut self) {
        self.selection = 0;
    }

    pub fn select_last(&mut self) {
        self.selection = self.row_count().saturating_sub(1);
    }

    // ===== Search =====

    /// Re-run the current query; roster changes discard earlier results.
    pub fn refresh_search(&mut self) {
        if !self.search_query.is_empty() {
            self.list.search(&self.search_query);
        }
        self.clamp_selection();
    }

    pub fn push_search_char(&mut self, c: char) {
        if can_add_field_char(self.search_query.chars().count(), c) {
            self.search_query.push(c);
            self.selection = 0;
            self.refresh_search();
        }
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
        self.selection = 0;
        self.refresh_search();
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.selection = 0;
    }

    // ===== Roster changes =====

    pub fn start_adding(&mut self) {
        self.form = MemberForm::default();
        self.state = AppState::AddingMember;
    }

    /// Add the member described by the form. Returns false and keeps the
    /// form open if it cannot be submitted.
    pub fn submit_form(&mut self) -> bool {
        match self.form.to_member() {
            Ok(member) => {
                self.status_message = Some(format!("Added {}", member));
                self.list.add_member(member);
                self.dirty = true;
                self.refresh_search();
                self.state = AppState::Normal;
                true
            }
            Err(message) => {
                self.form.error = Some(message);
                false
            }
        }
    }

    pub fn request_delete(&mut self) {
        if self.selected_member().is_some() {
            self.state = AppState::ConfirmingDelete;
        }
    }

    /// Delete the selected row by its roster position. Name lookup is not
    /// used, so members with an empty or lowercase name can be deleted too.
    pub fn delete_selected(&mut self) {
        let Some((index, member)) = self
            .visible_rows()
            .get(self.selection)
            .map(|&(index, member)| (index, member.clone()))
        else {
            return;
        };
        if self.list.delete_at(index) {
            self.status_message = Some(format!("Deleted {}", member));
            self.dirty = true;
        } else {
            warn!(member = %member, index, "Selected row is no longer in the roster");
            self.status_message = Some(format!("Could not delete {}", member));
        }
        self.refresh_search();
    }

    pub fn toggle_sort(&mut self) {
        let order = self.list.sort_order().toggle();
        self.list.set_sort_order(order);
        self.config.sort_order = order;
        self.refresh_search();
        self.status_message = Some(format!("Sorted by {}", order.to_string().to_lowercase()));
    }

    // ===== Filters =====

    pub fn start_picking_filter(&mut self) {
        self.filter_selection = 0;
        self.state = AppState::PickingFilter;
    }

    pub fn filter_next(&mut self) {
        let count = self.filter_options().len();
        if self.filter_selection + 1 < count {
            self.filter_selection += 1;
        }
    }

    pub fn filter_prev(&mut self) {
        self.filter_selection = self.filter_selection.saturating_sub(1);
    }

    /// Narrow the current view by the highlighted filter choice.
    pub fn apply_selected_filter(&mut self) {
        if let Some(filter) = self.filter_options().into_iter().nth(self.filter_selection) {
            self.status_message = Some(format!("Filtered: {}", filter));
            self.list.apply_filter(filter);
            self.selection = 0;
            self.refresh_search();
        }
        self.state = AppState::Normal;
    }

    pub fn reset_filters(&mut self) {
        self.list.reset_filters();
        self.selection = 0;
        self.refresh_search();
        self.status_message = Some("Filters cleared".to_string());
    }

    // ===== Import / export =====

    pub fn start_import(&mut self) {
        self.import_path.clear();
        self.state = AppState::EnteringImportPath;
    }

    pub fn import_from_prompt(&mut self) {
        let path = PathBuf::from(self.import_path.trim());
        self.state = AppState::Normal;
        if path.as_os_str().is_empty() {
            return;
        }

        match storage::import_members(&mut self.list, &path) {
            Ok(report) => {
                if report.imported > 0 {
                    self.dirty = true;
                }
                self.status_message = Some(if report.is_clean() {
                    format!("Imported {} members", report.imported)
                } else {
                    format!(
                        "Imported {} members, skipped {} rows ({})",
                        report.imported,
                        report.row_errors.len(),
                        report.row_errors[0]
                    )
                });
                self.selection = 0;
                self.refresh_search();
            }
            Err(e) => {
                warn!("Import failed: {}", e);
                self.status_message = Some(format!("Import failed: {}", e));
            }
        }
    }

    /// Write the whole roster to the storage file.
    pub fn save(&mut self) {
        let result = self.config.storage_path().and_then(|path| {
            storage::export_members(&self.list, &path)?;
            Ok(path)
        });

        match result {
            Ok(path) => {
                info!(path = %path.display(), "Saved roster");
                self.dirty = false;
                self.last_saved = Some(Local::now());
                self.status_message = Some(format!("Saved {} members", self.list.len()));
            }
            Err(e) => {
                warn!("Save failed: {:#}", e);
                self.status_message = Some(format!("Save failed: {:#}", e));
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
