//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{
    CreateUserLaResponse, CreateUserTokenResponse, OrgResponse, Project, RemoteSource,
    RemoteSourceResponse, RunResponse, User, UserResponse,
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(kind: &str, name: &str) -> Vec<String> {
    let title = format!("{kind}: {name}");
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        let mut lines = header("Project", self.path.as_deref().unwrap_or(&self.name));
        lines.push(format!("ID:             {}", self.id));
        lines.push(format!("Name:           {}", self.name));

        if let Some(owner_type) = self.owner_type {
            lines.push(format!("Owner Type:     {owner_type}"));
        }

        if let Some(ref repo) = self.repository_path {
            lines.push(format!("Repository:     {repo}"));
        }

        if self.skip_ssh_host_key_check {
            lines.push("SSH Host Key:   not checked".to_string());
        }

        lines.join("\n")
    }
}

impl PrettyPrint for User {
    fn pretty_print(&self) -> String {
        let mut lines = header("User", &self.user_name);
        lines.push(format!("ID:             {}", self.id));

        for la in self.linked_accounts.values() {
            lines.push(format!(
                "Linked:         {} ({})",
                la.remote_user_name.as_deref().unwrap_or("-"),
                la.id
            ));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for UserResponse {
    fn pretty_print(&self) -> String {
        let mut lines = header("User", &self.username);
        lines.push(format!("ID:             {}", self.id));
        lines.join("\n")
    }
}

impl PrettyPrint for RunResponse {
    fn pretty_print(&self) -> String {
        let mut lines = header("Run", &format!("{} #{}", self.name, self.counter));
        lines.push(format!("ID:             {}", self.id));
        lines.push(format!("Phase:          {}", self.phase));
        lines.push(format!("Result:         {}", self.result));

        if self.stopping {
            lines.push("Stopping:       yes".to_string());
        }

        if let Some(ref start) = self.start_time {
            lines.push(format!("Started:        {}", start.format(TIME_FORMAT)));
        }

        if let Some(ref end) = self.end_time {
            lines.push(format!("Ended:          {}", end.format(TIME_FORMAT)));
        }

        for task in self.tasks.values() {
            lines.push(format!(
                "Task:           {} [{}]",
                task.name,
                task.status.as_deref().unwrap_or("unknown")
            ));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for RemoteSource {
    fn pretty_print(&self) -> String {
        let mut lines = header("Remote Source", &self.name);
        lines.push(format!("ID:             {}", self.id));

        if let Some(ref source_type) = self.source_type {
            lines.push(format!("Type:           {source_type}"));
        }

        if let Some(ref api_url) = self.api_url {
            lines.push(format!("API URL:        {api_url}"));
        }

        if let Some(ref auth_type) = self.auth_type {
            lines.push(format!("Auth:           {auth_type}"));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for RemoteSourceResponse {
    fn pretty_print(&self) -> String {
        let mut lines = header("Remote Source", &self.name);
        lines.push(format!("ID:             {}", self.id));
        if let Some(ref auth_type) = self.auth_type {
            lines.push(format!("Auth:           {auth_type}"));
        }
        lines.join("\n")
    }
}

impl PrettyPrint for OrgResponse {
    fn pretty_print(&self) -> String {
        let mut lines = header("Organization", &self.name);
        lines.push(format!("ID:             {}", self.id));
        lines.join("\n")
    }
}

impl PrettyPrint for CreateUserLaResponse {
    fn pretty_print(&self) -> String {
        match (&self.linked_account, &self.oauth2_redirect) {
            (_, Some(redirect)) => format!("Open this URL to finish linking: {redirect}"),
            (Some(la), None) => format!("Linked account created: {}", la.id),
            (None, None) => "Linked account created".to_string(),
        }
    }
}

impl PrettyPrint for CreateUserTokenResponse {
    fn pretty_print(&self) -> String {
        format!("Token: {}\n(store it now, it will not be shown again)", self.token)
    }
}
