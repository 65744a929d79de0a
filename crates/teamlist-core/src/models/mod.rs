//! Data models for roster entries.
//!
//! - `Member`: one person on the team, with name, contact, grade, subteam and event
//! - `SortOrder`: which name the roster is ordered by

pub mod member;

pub use member::{Member, SortOrder, DEFAULT_SUBTEAMS, GRADES, NO_SUBTEAM};
