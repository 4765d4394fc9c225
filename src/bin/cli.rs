//! Badgeboard CLI Client
//!
//! Command-line interface for interacting with a Badgeboard server.

use std::fs;
use std::path::{Path, PathBuf};

use badgeboard::network::Client;
use badgeboard::protocol::{Command, NewAchievement, NewMember, Status, Upload};
use badgeboard::Result;
use clap::{Parser, Subcommand};

/// Badgeboard CLI
#[derive(Parser, Debug)]
#[command(name = "badgeboard-cli")]
#[command(about = "CLI for the Badgeboard achievement server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List members with their achievements
    List,

    /// Create a member
    AddMember {
        /// Display name
        #[arg(long)]
        name: String,

        /// Role label
        #[arg(long)]
        role: String,

        /// Avatar image to upload
        #[arg(long)]
        avatar: Option<PathBuf>,
    },

    /// Award an achievement to a member
    AddAchievement {
        /// Member receiving the badge
        #[arg(long)]
        member_id: u64,

        /// Badge category, e.g. positive or negative
        #[arg(long)]
        category: String,

        /// Badge image to upload
        #[arg(long)]
        image: PathBuf,
    },

    /// Ping the server
    Ping,
}

fn main() {
    let args = Args::parse();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Execute the command; `Ok(false)` means the server rejected it
fn run(args: Args) -> Result<bool> {
    let command = match args.command {
        Commands::List => Command::ListMembers,
        Commands::AddMember { name, role, avatar } => Command::AddMember(NewMember {
            name,
            role,
            avatar: avatar.as_deref().map(read_upload).transpose()?,
        }),
        Commands::AddAchievement {
            member_id,
            category,
            image,
        } => Command::AddAchievement(NewAchievement {
            member_id,
            category,
            image: Some(read_upload(&image)?),
        }),
        Commands::Ping => Command::Ping,
    };

    let mut client = Client::connect(&args.server)?;
    let response = client.send(&command)?;

    match response.json() {
        Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
        Err(_) => {
            let text = response.payload.as_deref().unwrap_or_default();
            println!("{}", String::from_utf8_lossy(text));
        }
    }

    Ok(response.status == Status::Ok)
}

fn read_upload(path: &Path) -> Result<Upload> {
    Ok(Upload {
        filename: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        bytes: fs::read(path)?,
    })
}
