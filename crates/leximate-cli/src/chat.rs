//! Line-oriented chat REPL.

use std::sync::Arc;

use leximate_app::{ChatView, Notifier};
use leximate_client::ApiClient;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::display;

const HELP: &str = "commands: /history  /open <id>  /delete <id>  /new  /quit";

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Say(&'a str),
    History,
    Open(&'a str),
    Delete(&'a str),
    New,
    Quit,
    Help,
}

fn parse_input(line: &str) -> Input<'_> {
    let Some(cmd) = line.trim().strip_prefix('/') else {
        return Input::Say(line);
    };
    let (name, arg) = cmd.split_once(' ').unwrap_or((cmd, ""));
    let arg = arg.trim();
    match name {
        "history" => Input::History,
        "open" if !arg.is_empty() => Input::Open(arg),
        "delete" if !arg.is_empty() => Input::Delete(arg),
        "new" => Input::New,
        "quit" | "exit" => Input::Quit,
        _ => Input::Help,
    }
}

pub async fn run(client: Arc<ApiClient>, notifier: Arc<dyn Notifier>) -> anyhow::Result<()> {
    let mut view = ChatView::new(client, notifier);
    view.enter().await;
    print_transcript(&view);
    println!("{HELP}");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_input(&line) {
            Input::Say(text) => {
                let before = view.messages().len();
                view.set_input(text);
                view.send().await;
                for msg in view.messages().iter().skip(before) {
                    display::print_message(msg);
                }
            }
            Input::History => display::print_history(view.history()),
            Input::Open(id) => {
                if view.select(id).await {
                    print_transcript(&view);
                } else {
                    println!("could not open chat {id}");
                }
            }
            Input::Delete(id) => {
                let was_current = view.session_id() == Some(id);
                if view.delete(id).await && was_current {
                    print_transcript(&view);
                }
            }
            Input::New => {
                view.enter().await;
                print_transcript(&view);
            }
            Input::Quit => break,
            Input::Help => println!("{HELP}"),
        }
    }
    Ok(())
}

fn print_transcript(view: &ChatView<ApiClient>) {
    if view.session_id().is_none() {
        println!("(offline: could not start a chat session)");
    }
    for msg in view.messages() {
        display::print_message(msg);
    }
    for q in view.suggestions() {
        println!("  try: {q}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_plain_text() {
        assert_eq!(parse_input("  What is an NDA? "), Input::Say("  What is an NDA? "));
        assert_eq!(parse_input("/history"), Input::History);
        assert_eq!(parse_input("/open  abc "), Input::Open("abc"));
        assert_eq!(parse_input("/delete x1"), Input::Delete("x1"));
        assert_eq!(parse_input("/open"), Input::Help);
        assert_eq!(parse_input("/new"), Input::New);
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input("/bogus"), Input::Help);
    }
}
