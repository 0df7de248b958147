//! Plain-text rendering for documents, dashboard, chat and profile.

use leximate_app::{Notice, NoticeKind, Notifier, Preview, Step};
use leximate_core::{ChatSession, DashboardSummary, DeliveryState, DocumentRecord, Message, Profile};

const MAX_NAME: usize = 40;
const MAX_PARTIES: usize = 3;

/// Prints notices to stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Info => eprintln!("  {}", notice.text),
            NoticeKind::Failure => eprintln!("error: {}", notice.text),
        }
    }
}

// ── Documents ──

pub fn print_document_table(docs: &[&DocumentRecord]) {
    if docs.is_empty() {
        println!("No documents.");
        return;
    }
    println!(
        "{:<26}  {:<40}  {:<10}  {:<10}  {:>8}",
        "ID", "NAME", "TYPE", "STATUS", "SIZE"
    );
    for doc in docs {
        println!("{}", document_row(doc));
    }
    println!();
    println!("{} document(s)", docs.len());
}

fn document_row(doc: &DocumentRecord) -> String {
    format!(
        "{:<26}  {:<40}  {:<10}  {:<10}  {:>8}",
        doc.id,
        truncate(&doc.name, MAX_NAME),
        doc.doc_type,
        doc.status.as_str(),
        doc.size
    )
}

pub fn print_document_card(doc: &DocumentRecord) {
    println!("=== {} ===", doc.name);
    println!();
    field("id", &doc.id);
    field("type", &doc.doc_type);
    field("status", doc.status.as_str());
    field("created", &doc.created_date);
    field("modified", &doc.last_modified);
    field("size", &doc.size);
    if !doc.parties.is_empty() {
        println!("  parties ({}):", doc.parties.len());
        for p in doc.parties.iter().take(MAX_PARTIES) {
            println!("    {p}");
        }
        if doc.parties.len() > MAX_PARTIES {
            println!("    ... and {} more", doc.parties.len() - MAX_PARTIES);
        }
    }
}

pub fn print_preview(preview: &Preview) {
    println!("=== {} ===", preview.title);
    println!();
    println!("{}", preview.content);
}

// ── Wizard ──

pub fn print_step(step: Step) {
    println!("[{}/4] {} - {}", step.number(), step.title(), step.description());
}

// ── Dashboard ──

pub fn print_summary(summary: &DashboardSummary) {
    println!("=== Dashboard ===");
    println!();
    for stat in &summary.stats {
        println!("  {:<20} {:>5}  {}", stat.label, stat.value, stat.change);
    }
    println!();
    println!("  Recent documents:");
    if summary.recent.is_empty() {
        println!("    (none)");
    }
    for doc in &summary.recent {
        println!(
            "    {:<10} {:<10} {}  {}",
            doc.name, doc.status, doc.date_display, doc.id
        );
    }
}

// ── Chat ──

pub fn print_message(msg: &Message) {
    let who = if msg.is_user { "you" } else { "lexi" };
    println!(
        "{} {who}{}: {}",
        msg.timestamp.format("%H:%M"),
        delivery_marker(msg.delivery),
        msg.content
    );
}

fn delivery_marker(state: DeliveryState) -> &'static str {
    match state {
        DeliveryState::Pending => " (sending)",
        DeliveryState::Confirmed => "",
        DeliveryState::Failed => " (not sent)",
    }
}

pub fn print_history(sessions: &[ChatSession]) {
    if sessions.is_empty() {
        println!("  No previous chats.");
        return;
    }
    for s in sessions {
        let title = if s.title.is_empty() { "Untitled" } else { &s.title };
        println!(
            "  {:<26}  {:<40}  {}",
            s.id,
            truncate(title, MAX_NAME),
            s.updated_at.as_deref().unwrap_or("-")
        );
    }
}

// ── Profile ──

pub fn print_profile(p: &Profile) {
    let name = format!("{} {}", p.first_name, p.last_name);
    println!("=== {} ({}) ===", name.trim(), p.initials());
    println!();
    field("email", &p.email);
    field("phone", &p.phone);
    field("company", &p.company);
    field("role", &p.role);
    field("jurisdiction", &p.jurisdiction);
    field("language", &p.language);
    field("timezone", &p.timezone);
    field("avatar", &p.avatar_url);
    if !p.bio.is_empty() {
        println!();
        println!("  {}", p.bio);
    }
}

fn field(name: &str, value: &str) {
    if !value.is_empty() {
        println!("  {:<14} {}", format!("{name}:"), value);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max - 3).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leximate_core::DocumentStatus;

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate("ééééééééé", 6), "ééé...");
    }

    #[test]
    fn row_shows_status_and_size() {
        let doc = DocumentRecord {
            id: "d1".into(),
            name: "nda - Acme".into(),
            doc_type: "nda".into(),
            status: DocumentStatus::Draft,
            created_date: String::new(),
            last_modified: String::new(),
            size: "3 KB".into(),
            parties: vec!["Acme".into()],
        };
        let row = document_row(&doc);
        assert!(row.starts_with("d1 "));
        assert!(row.contains("nda - Acme"));
        assert!(row.contains("draft"));
        assert!(row.trim_end().ends_with("3 KB"));
    }

    #[test]
    fn failed_messages_are_marked() {
        assert_eq!(delivery_marker(DeliveryState::Failed), " (not sent)");
        assert_eq!(delivery_marker(DeliveryState::Confirmed), "");
    }
}
