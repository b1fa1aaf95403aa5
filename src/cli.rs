//! Command-line arguments for the `whd` binary.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

/// `whd [--json] <command>`
#[derive(Parser, Debug)]
#[command(name = "whd", version, about = "Web Help Desk command-line client")]
pub struct Cli {
    /// Print results as JSON.
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,

    /// The command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open a session, print its key, then close it again.
    Session,

    /// Show one ticket.
    Ticket {
        /// Ticket id.
        id: u64,
    },

    /// Search tickets.
    Tickets {
        /// Qualifier expression, e.g. `(statustype.statusTypeName = 'Open')`.
        #[arg(long, default_value = "")]
        qualifier: String,
        /// Page size (1-100).
        #[arg(long, default_value_t = crate::models::DEFAULT_PAGE_SIZE)]
        limit: u32,
        /// Page number, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// List the notes on a ticket.
    Notes {
        /// Ticket id.
        ticket: u64,
    },

    /// Add a note to a ticket.
    Note {
        /// Ticket id.
        ticket: u64,
        /// Note text.
        text: String,
        /// Hide the note from the client.
        #[arg(long, default_value_t = false)]
        hidden: bool,
    },

    /// Find assets by asset number.
    Asset {
        /// Asset number.
        number: String,
    },

    /// Show one location.
    Location {
        /// Location id.
        id: u64,
    },

    /// Print a reference list.
    Lists {
        /// Which list.
        #[arg(value_enum)]
        kind: ListKind,
    },

    /// Download an attachment.
    #[command(group(ArgGroup::new("output").args(["out", "base64"])))]
    Attachment {
        /// Attachment id.
        id: u64,
        /// Write the content to this file.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print the content base64-encoded.
        #[arg(long, default_value_t = false)]
        base64: bool,
    },

    /// Upload a file to a ticket or a note.
    #[command(group(ArgGroup::new("entity").args(["ticket", "note"]).required(true)))]
    Upload {
        /// Ticket to attach to.
        #[arg(long)]
        ticket: Option<u64>,
        /// Note to attach to.
        #[arg(long)]
        note: Option<u64>,
        /// File to upload.
        path: PathBuf,
        /// File name shown in Web Help Desk (defaults to the file's name).
        #[arg(long)]
        name: Option<String>,
        /// Delete the local file after a successful upload.
        #[arg(long, default_value_t = false)]
        delete_after: bool,
    },
}

/// Reference lists printable with `whd lists`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    /// Request types.
    RequestTypes,
    /// Ticket statuses.
    StatusTypes,
    /// Ticket priorities.
    PriorityTypes,
    /// Technicians.
    Techs,
    /// Locations that are not deleted.
    Locations,
    /// Ticket custom field definitions.
    CustomFields,
    /// Location custom field definitions.
    LocationCustomFields,
    /// Asset custom field definitions.
    AssetCustomFields,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tickets_defaults() {
        let cli = Cli::try_parse_from(["whd", "tickets"]).unwrap();
        match cli.command {
            Commands::Tickets { qualifier, limit, page } => {
                assert_eq!(qualifier, "");
                assert_eq!(limit, 25);
                assert_eq!(page, 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_global_json_after_subcommand() {
        let cli = Cli::try_parse_from(["whd", "ticket", "12", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Ticket { id: 12 }));
    }

    #[test]
    fn test_parse_lists_kind() {
        let cli = Cli::try_parse_from(["whd", "lists", "location-custom-fields"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Lists { kind: ListKind::LocationCustomFields }
        ));
    }

    #[test]
    fn test_upload_needs_exactly_one_entity() {
        assert!(Cli::try_parse_from(["whd", "upload", "a.txt"]).is_err());
        assert!(
            Cli::try_parse_from(["whd", "upload", "--ticket", "1", "--note", "2", "a.txt"]).is_err()
        );

        let args = ["whd", "upload", "--note", "2", "a.txt", "--delete-after"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Upload { ticket, note, delete_after, .. } => {
                assert_eq!(ticket, None);
                assert_eq!(note, Some(2));
                assert!(delete_after);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_attachment_out_and_base64_conflict() {
        assert!(
            Cli::try_parse_from(["whd", "attachment", "5", "--out", "x.bin", "--base64"]).is_err()
        );
    }
}
