//! Command-word dispatcher shared by the CLI and the GUI bridge.
//!
//! # Responsibility
//! - Split a raw input line into a command word and its argument text.
//! - Route the command to the matching [`TaskList`] operation.
//!
//! # Invariants
//! - Every input line yields exactly one reply message.
//! - The dispatcher holds no state of its own.

use crate::clock::Clock;
use crate::list::TaskList;
use log::debug;

pub const HELP_TEXT: &str = "Commands:
  todo <description>
  deadline <description> /by YYYY-MM-DD
  event <description> /from YYYY-MM-DD /to YYYY-MM-DD
  list | all | snoozed
  mark <n> | unmark <n> | delete <n>
  find <keyword>
  snooze <n> [forever|YYYY-MM-DD] | unsnooze <n>
  save | help | bye";

const COMMAND_WORDS: &[&str] = &[
    "todo", "deadline", "event", "list", "all", "snoozed", "find", "mark", "unmark", "delete",
    "snooze", "unsnooze", "save", "help", "bye", "exit",
];

const FAREWELL: &str = "Bye. Hope to see you again soon!";
const SAVED: &str = "Your tasks have been saved.";

/// Outcome of one dispatched line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Text to show the user.
    pub message: String,
    /// Whether the front-end should write the list to disk now.
    pub persist: bool,
    /// Whether the session should end.
    pub exit: bool,
}

impl Reply {
    fn show(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            persist: false,
            exit: false,
        }
    }

    fn changed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            persist: true,
            exit: false,
        }
    }

    fn unsaved(self) -> Self {
        Self {
            persist: false,
            ..self
        }
    }
}

/// Runs one line of user input against `list`.
pub fn dispatch<C: Clock>(list: &mut TaskList<C>, input: &str) -> Reply {
    let input = input.trim();
    let (word, args) = match input.split_once(char::is_whitespace) {
        Some((word, args)) => (word, args.trim()),
        None => (input, ""),
    };
    let word = word.to_ascii_lowercase();
    debug!(
        "event=command_dispatch module=command word={}",
        log_word(&word)
    );

    match word.as_str() {
        "" => Reply::show(HELP_TEXT),
        "todo" => add(list, |list| list.add_plain(args)),
        "deadline" => add(list, |list| list.add_deadline(args)),
        "event" => add(list, |list| list.add_event(args)),
        "list" => Reply::show(list.show_list()),
        "all" => Reply::show(list.show_all_tasks()),
        "snoozed" => Reply::show(list.show_snoozable_tasks()),
        "find" => Reply::show(list.find_tasks_message(args)),
        "mark" => with_index(list, args, "mark", |list, index| list.mark_task(index)),
        "unmark" => with_index(list, args, "unmark", |list, index| list.unmark_task(index)),
        "delete" => with_index(list, args, "delete", |list, index| list.delete(index)),
        // Snooze state is not part of the stored line.
        "unsnooze" => {
            with_index(list, args, "unsnooze", |list, index| list.unsnooze_task(index)).unsaved()
        }
        "snooze" => snooze(list, args).unsaved(),
        "save" => Reply::changed(SAVED),
        "help" => Reply::show(HELP_TEXT),
        "bye" | "exit" => Reply {
            message: FAREWELL.to_string(),
            persist: true,
            exit: true,
        },
        other => Reply::show(format!(
            "Sorry, I don't know what `{other}` means. Type `help` to see the commands."
        )),
    }
}

// Free text never reaches the log.
fn log_word(word: &str) -> &str {
    match word {
        "" => "empty",
        known if COMMAND_WORDS.contains(&known) => known,
        _ => "unknown",
    }
}

fn add<C: Clock>(list: &mut TaskList<C>, op: impl FnOnce(&mut TaskList<C>) -> String) -> Reply {
    let before = list.size();
    let message = op(list);
    if list.size() > before {
        Reply::changed(message)
    } else {
        Reply::show(message)
    }
}

fn snooze<C: Clock>(list: &mut TaskList<C>, args: &str) -> Reply {
    let (index_text, until) = match args.split_once(char::is_whitespace) {
        Some((index_text, until)) => (index_text, until.trim()),
        None => (args, ""),
    };
    with_index(list, index_text, "snooze", |list, index| {
        if until.is_empty() || until.eq_ignore_ascii_case("forever") {
            list.snooze_task_forever(index)
        } else {
            list.snooze_task_until(index, until)
        }
    })
}

/// Runs `op` on a parsed 1-based index; only an index naming a task asks for a save.
fn with_index<C: Clock>(
    list: &mut TaskList<C>,
    args: &str,
    word: &str,
    op: impl FnOnce(&mut TaskList<C>, usize) -> String,
) -> Reply {
    match args.trim().parse::<usize>() {
        Ok(index) if (1..=list.size()).contains(&index) => Reply::changed(op(list, index)),
        Ok(index) => Reply::show(op(list, index)),
        Err(_) => Reply::show(format!(
            "Please give the task number to {word}, e.g. `{word} 2`."
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{dispatch, log_word, HELP_TEXT};
    use crate::clock::FixedClock;
    use crate::list::TaskList;
    use crate::storage::codec::encode_task;
    use chrono::NaiveDate;

    fn list() -> TaskList<FixedClock> {
        TaskList::with_clock(FixedClock(
            NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid test date"),
        ))
    }

    #[test]
    fn command_words_are_case_insensitive() {
        let mut list = list();
        let reply = dispatch(&mut list, "TODO read");
        assert!(reply.persist);
        assert_eq!(list.size(), 1);
    }

    #[test]
    fn non_numeric_index_is_a_usage_message() {
        let mut list = list();
        list.add_plain("read");
        let reply = dispatch(&mut list, "mark first");
        assert!(!reply.persist);
        assert!(reply.message.contains("mark 2"));
        assert!(!list
            .get_task(0)
            .expect("task 1 should exist")
            .is_completed());
    }

    #[test]
    fn snooze_defaults_to_forever() {
        let mut list = list();
        list.add_plain("read");
        dispatch(&mut list, "snooze 1");
        assert!(list.show_snoozable_tasks().contains("[SNOOZED FOREVER]"));

        dispatch(&mut list, "snooze 1 2025-06-20");
        assert!(list
            .show_snoozable_tasks()
            .contains("[SNOOZED UNTIL 2025-06-20]"));
    }

    #[test]
    fn bye_requests_save_and_exit() {
        let mut list = list();
        let reply = dispatch(&mut list, "bye");
        assert!(reply.exit);
        assert!(reply.persist);
        assert_eq!(dispatch(&mut list, "   ").message, HELP_TEXT);
    }

    #[test]
    fn unknown_word_points_to_help() {
        let mut list = list();
        assert!(dispatch(&mut list, "dance now").message.contains("help"));
    }

    #[test]
    fn only_real_changes_ask_for_a_save() {
        let mut list = list();
        assert!(dispatch(&mut list, "todo read").persist);

        let missing = dispatch(&mut list, "mark 5");
        assert_eq!(missing.message, "Task does not exist!");
        assert!(!missing.persist);
        assert!(!dispatch(&mut list, "delete 0").persist);
        assert!(!dispatch(&mut list, "todo   ").persist);
        assert!(!dispatch(&mut list, "deadline report /by tomorrow").persist);
        assert!(!dispatch(&mut list, "snooze 1").persist);

        assert!(dispatch(&mut list, "mark 1").persist);
        assert!(dispatch(&mut list, "delete 1").persist);
        assert!(list.is_empty());
    }

    #[test]
    fn multi_line_description_is_not_added() {
        let mut list = list();
        let reply = dispatch(&mut list, "todo a\n[T][X] injected");
        assert!(!reply.persist);
        assert!(reply.message.contains("line breaks"));
        assert_eq!(list.size(), 0);

        dispatch(&mut list, "todo a b");
        let lines = list.tasks().iter().map(encode_task).collect::<Vec<_>>();
        assert_eq!(lines, vec!["[T][ ] a b"]);
    }

    #[test]
    fn log_word_hides_free_text() {
        assert_eq!(log_word("mark"), "mark");
        assert_eq!(log_word(""), "empty");
        assert_eq!(log_word("my-secret-password"), "unknown");
    }
}
