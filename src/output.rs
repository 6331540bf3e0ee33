//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Alert, Dashboard, Event, User};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Alert {
    fn pretty_print(&self) -> String {
        let divider = "─".repeat(self.name.len().max(30));

        let mut lines = vec![
            format!("Alert: {}", self.name),
            divider,
            format!("ID:             {}", self.id.as_deref().unwrap_or("-")),
            format!("Severity:       {}", self.severity),
            format!("Minutes:        {}", self.minutes),
        ];

        if !self.condition.is_empty() {
            lines.push(format!("Condition:      {}", self.condition));
        }

        if !self.target.is_empty() {
            lines.push(format!("Target:         {}", self.target));
        }

        if !self.status.is_empty() {
            lines.push(format!("Status:         {}", self.status.join(", ")));
        }

        if !self.tags.is_empty() {
            lines.push(format!("Tags:           {}", self.tags.join(", ")));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Dashboard {
    fn pretty_print(&self) -> String {
        let divider = "─".repeat(self.name.len().max(30));

        let chart_count: usize = self
            .sections
            .iter()
            .flat_map(|s| &s.rows)
            .map(|r| r.charts.len())
            .sum();

        let mut lines = vec![
            format!("Dashboard: {}", self.name),
            divider,
            format!("ID:             {}", self.id),
            format!("Sections:       {}", self.sections.len()),
            format!("Charts:         {}", chart_count),
        ];

        if !self.description.is_empty() {
            lines.push(format!("Description:    {}", self.description));
        }

        if !self.tags.is_empty() {
            lines.push(format!("Tags:           {}", self.tags.join(", ")));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for User {
    fn pretty_print(&self) -> String {
        let id = self.id.as_deref().unwrap_or("-");
        let divider = "─".repeat(id.len().max(30));

        let mut lines = vec![
            format!("User: {}", id),
            divider,
            format!("Customer:       {}", self.customer),
        ];

        if !self.permissions.is_empty() {
            lines.push(format!("Permissions:    {}", self.permissions.join(", ")));
        }

        let group_ids = self.groups.ids();
        if !group_ids.is_empty() {
            lines.push(format!("Groups:         {}", group_ids.join(", ")));
        }

        if self.last_successful_login > 0 {
            lines.push(format!("Last Login:     {} ms", self.last_successful_login));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Event {
    fn pretty_print(&self) -> String {
        let divider = "─".repeat(self.name.len().max(30));

        let mut lines = vec![
            format!("Event: {}", self.name),
            divider,
            format!("ID:             {}", self.id.as_deref().unwrap_or("-")),
            format!("Start:          {}", self.start_time),
        ];

        if self.end_time > 0 {
            lines.push(format!("End:            {}", self.end_time));
        }

        if !self.severity.is_empty() {
            lines.push(format!("Severity:       {}", self.severity));
        }

        if !self.event_type.is_empty() {
            lines.push(format!("Type:           {}", self.event_type));
        }

        if !self.details.is_empty() {
            lines.push(format!("Details:        {}", self.details));
        }

        lines.join("\n")
    }
}
