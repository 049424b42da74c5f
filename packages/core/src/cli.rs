use clap::{Parser, Subcommand};

use crate::models::{NotificationPermission, Role, ShopId, SlotId, DEFAULT_REMINDER_MINUTES};

/// Barber booking CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "barber-booking",
    version,
    about = "Book barber appointments and view today's shop schedules"
)]
pub struct Cli {
    /// Notification permission (default, granted or denied)
    #[arg(long)]
    pub permission: Option<NotificationPermission>,

    /// Webhook URL that receives fired reminders
    #[arg(long)]
    pub webhook_url: Option<String>,

    /// View to start in (customer or barber)
    #[arg(long)]
    pub role: Option<Role>,
}

/// One line typed into the interactive session.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SessionCommand {
    /// List all shops
    Shops {
        /// Print the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one shop (detail for customers, schedule for barbers)
    Shop { id: ShopId },
    /// Show today's schedule for a shop, including customer details
    Schedule { id: ShopId },
    /// Book an available slot
    Book {
        shop: ShopId,
        slot: SlotId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        /// Minutes before the appointment to send a reminder
        #[arg(long, default_value_t = DEFAULT_REMINDER_MINUTES)]
        remind: u32,
    },
    /// Leave a review for a shop
    Review {
        shop: ShopId,
        #[arg(long)]
        author: String,
        /// Stars from 1 to 5
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: String,
    },
    /// Switch between the customer and barber views
    Role { role: Role },
    /// Print metrics in Prometheus text format
    Metrics,
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

impl SessionLine {
    /// Split and parse one input line. Help requests and usage errors come
    /// back as `Err` with the text clap would print.
    pub fn parse_line(line: &str) -> Result<SessionCommand, String> {
        let args = split_args(line)?;
        SessionLine::try_parse_from(args)
            .map(|parsed| parsed.command)
            .map_err(|e| e.to_string())
    }
}

/// Split a line on whitespace, keeping double-quoted runs together.
///
/// A backslash makes the next character literal, so `\"` enters a quote
/// and `\\` a backslash.
pub fn split_args(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next().ok_or("dangling escape at end of line")?;
                current.push(escaped);
                has_token = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quote".to_string());
    }
    if has_token {
        args.push(current);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_quoted_words_together() {
        let args = split_args(r#"book 1 2 --name "John Doe" --phone 555"#).unwrap();
        assert_eq!(args, vec!["book", "1", "2", "--name", "John Doe", "--phone", "555"]);
    }

    #[test]
    fn split_keeps_empty_quoted_argument() {
        let args = split_args(r#"review 1 --author "" --rating 5 --comment x"#).unwrap();
        assert_eq!(args[3], "");
    }

    #[test]
    fn split_unescapes_quotes_and_backslashes() {
        let args = split_args(r#"book 1 2 --name "Dwayne \"The Fade\" J" --phone 5\\5"#).unwrap();
        assert_eq!(args[4], r#"Dwayne "The Fade" J"#);
        assert_eq!(args[6], r"5\5");
    }

    #[test]
    fn split_rejects_dangling_escape() {
        assert!(split_args(r"book 1 2 --name A\").is_err());
    }

    #[test]
    fn split_rejects_unterminated_quote() {
        assert!(split_args(r#"book 1 2 --name "John"#).is_err());
    }

    #[test]
    fn parses_book_with_default_reminder() {
        let cmd = SessionLine::parse_line("book 1 2 --name A --phone 555").unwrap();
        assert_eq!(
            cmd,
            SessionCommand::Book {
                shop: 1,
                slot: 2,
                name: "A".to_string(),
                phone: "555".to_string(),
                remind: 30,
            }
        );
    }

    #[test]
    fn parses_role_switch() {
        let cmd = SessionLine::parse_line("role barber").unwrap();
        assert_eq!(cmd, SessionCommand::Role { role: Role::Barber });
    }

    #[test]
    fn exit_is_an_alias_for_quit() {
        assert_eq!(SessionLine::parse_line("exit").unwrap(), SessionCommand::Quit);
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(SessionLine::parse_line("cancel 1 2").is_err());
    }

    #[test]
    fn cli_parses_permission_flag() {
        let cli = Cli::try_parse_from(["barber-booking", "--permission", "granted"]).unwrap();
        assert_eq!(cli.permission, Some(NotificationPermission::Granted));
        assert_eq!(cli.role, None);
    }
}
