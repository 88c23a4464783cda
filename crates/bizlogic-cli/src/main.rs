//! Business-logic program editor CLI.
//!
//! Provides the `bizlogic` binary for browsing interfaces, programs and
//! versions over the REST API, inspecting the composite toolbox of a
//! version, and moving program text between files and the server. Program
//! text always passes through the same workspace synchronizer the editor
//! uses, so exported and imported text is validated and normalized.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::Level;

use bizlogic_client::descriptors::version_function_libs_fragment;
use bizlogic_client::{ClientConfig, ClientError, FetchCache, HttpTransport};
use bizlogic_core::toolbox::{CompositeToolbox, Fragment, ToolboxTracker};
use bizlogic_core::{Entity, InterfaceId, ProgramId, VersionId, VersionRecord};
use bizlogic_workspace::{EditorSession, WorkspaceError, XmlWorkspaceLibrary};

/// Business-logic program editor tools.
#[derive(Parser)]
#[command(name = "bizlogic", about = "Business-logic program editor tools")]
struct Cli {
    /// REST API root (overrides BIZLOGIC_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List program interfaces.
    Interfaces,

    /// List the programs of an interface.
    Programs { interface: i64 },

    /// List the versions of a program.
    Versions { interface: i64, program: i64 },

    /// Show the selection context and metadata of a version.
    Show {
        interface: i64,
        program: i64,
        version: i64,
    },

    /// Print the composite toolbox built for a version.
    Toolbox {
        interface: i64,
        program: i64,
        version: i64,
    },

    /// Write a version's normalized program text.
    Export {
        interface: i64,
        program: i64,
        version: i64,

        /// Output file (default: stdout).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Replace a version's program with the contents of FILE and save it.
    Import {
        interface: i64,
        program: i64,
        version: i64,
        file: PathBuf,

        /// Save as a new version with this title instead of overwriting.
        #[arg(long, value_name = "TITLE")]
        as_new: Option<String>,
    },
}

/// Command failure, mapped to the process exit code.
enum Failure {
    Client(ClientError),
    Workspace(WorkspaceError),
    Io { path: PathBuf, err: std::io::Error },
    IncompleteToolbox { missing: Vec<Fragment> },
}

impl From<ClientError> for Failure {
    fn from(err: ClientError) -> Self {
        Failure::Client(err)
    }
}

impl From<WorkspaceError> for Failure {
    fn from(err: WorkspaceError) -> Self {
        Failure::Workspace(err)
    }
}

impl Failure {
    /// 1 = generic error, 2 = entity not found, 3 = transport failure.
    fn exit_code(&self) -> i32 {
        match self {
            Failure::Client(err) if err.is_not_found() => 2,
            Failure::Client(err) if err.is_transport() => 3,
            _ => 1,
        }
    }

    fn report(&self) {
        match self {
            Failure::Client(err) if err.is_transport() => eprintln!("Transport error: {}", err),
            Failure::Client(err) => eprintln!("Error: {}", err),
            Failure::Workspace(err) => eprintln!("Program error: {}", err),
            Failure::Io { path, err } => eprintln!("I/O error on '{}': {}", path.display(), err),
            Failure::IncompleteToolbox { missing } => {
                eprintln!("Error: toolbox incomplete, missing: {:?}", missing)
            }
        }
    }
}

type Cache = FetchCache<HttpTransport>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    let exit_code = match run(cli.command, &config).await {
        Ok(()) => 0,
        Err(failure) => {
            failure.report();
            failure.exit_code()
        }
    };
    process::exit(exit_code);
}

async fn run(command: Commands, config: &ClientConfig) -> Result<(), Failure> {
    let transport = HttpTransport::new(config).map_err(ClientError::from)?;
    let cache: Cache = FetchCache::new(transport, config.endpoints());
    tracing::debug!("using API at {}", config.api_url);

    match command {
        Commands::Interfaces => run_interfaces(&cache).await,
        Commands::Programs { interface } => run_programs(&cache, InterfaceId(interface)).await,
        Commands::Versions { interface, program } => {
            run_versions(&cache, InterfaceId(interface), ProgramId(program)).await
        }
        Commands::Show {
            interface,
            program,
            version,
        } => run_show(&cache, InterfaceId(interface), ProgramId(program), VersionId(version)).await,
        Commands::Toolbox {
            interface,
            program,
            version,
        } => {
            let version = cache
                .fetch_version(InterfaceId(interface), ProgramId(program), VersionId(version))
                .await?;
            let tracker = build_toolbox(&cache, InterfaceId(interface), &version).await?;
            println!("{}", complete_toolbox(&tracker)?.document);
            Ok(())
        }
        Commands::Export {
            interface,
            program,
            version,
            out,
        } => {
            let version = cache
                .fetch_version(InterfaceId(interface), ProgramId(program), VersionId(version))
                .await?;
            let session = open_session(&cache, InterfaceId(interface), &version).await?;
            let text = session.program_text()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, &text).map_err(|err| Failure::Io { path, err })?
                }
                None => println!("{}", text),
            }
            Ok(())
        }
        Commands::Import {
            interface,
            program,
            version,
            file,
            as_new,
        } => {
            let text = std::fs::read_to_string(&file).map_err(|err| Failure::Io {
                path: file.clone(),
                err,
            })?;
            let record = cache
                .fetch_version(InterfaceId(interface), ProgramId(program), VersionId(version))
                .await?;
            let mut session = open_session(&cache, InterfaceId(interface), &record).await?;
            session.replace_program(&text)?;
            let normalized = session.program_text()?;

            let saved = match as_new {
                Some(title) => {
                    cache
                        .save_version_as(
                            ProgramId(program),
                            &title,
                            record.description(),
                            &normalized,
                        )
                        .await?
                }
                None => cache.save_version(&record, &normalized).await?,
            };
            println!("{}\t{}", saved.id(), saved.title());
            Ok(())
        }
    }
}

async fn run_interfaces(cache: &Cache) -> Result<(), Failure> {
    cache.fetch_interfaces().await?;
    if let Some(interfaces) = cache.interfaces().await {
        for interface in interfaces.iter() {
            println!("{}\t{}", interface.id(), interface.title());
        }
    }
    Ok(())
}

async fn run_programs(cache: &Cache, interface: InterfaceId) -> Result<(), Failure> {
    cache.fetch_programs(interface).await?;
    if let Some(programs) = cache.programs().await {
        for program in programs.iter() {
            println!("{}\t{}", program.id(), program.title());
        }
    }
    Ok(())
}

async fn run_versions(
    cache: &Cache,
    interface: InterfaceId,
    program: ProgramId,
) -> Result<(), Failure> {
    cache.fetch_versions(interface, program).await?;
    if let Some(versions) = cache.versions().await {
        for version in versions.iter() {
            println!("{}\t{}\t{}", version.id(), version.title(), version.description());
        }
    }
    Ok(())
}

async fn run_show(
    cache: &Cache,
    interface: InterfaceId,
    program: ProgramId,
    version: VersionId,
) -> Result<(), Failure> {
    let record = cache.fetch_version(interface, program, version).await?;
    let libraries = match record.environment() {
        Some(environment) => environment
            .function_libraries()
            .map_err(ClientError::from)?
            .into_iter()
            .map(|library| library.title)
            .collect(),
        None => Vec::new(),
    };
    let selection = cache.selection().await;
    let summary = json!({
        "selection": selection,
        "url": record.url(),
        "description": record.description(),
        "has_program": record.program_text().is_some_and(|text| !text.trim().is_empty()),
        "function_libraries": libraries,
    });
    let text = serde_json::to_string_pretty(&summary)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize summary: {}\"}}", e));
    println!("{}", text);
    Ok(())
}

/// Fetches the descriptor fragments concurrently and feeds them to a tracker.
async fn build_toolbox(
    cache: &Cache,
    interface: InterfaceId,
    version: &VersionRecord,
) -> Result<ToolboxTracker, Failure> {
    let descriptors = cache.descriptors();
    let (references, arguments) = tokio::join!(
        descriptors.references_fragment(),
        descriptors.argument_fields_fragment(interface),
    );

    let mut tracker = ToolboxTracker::new();
    tracker.update(Fragment::References, references?);
    tracker.update(Fragment::ArgumentFields, arguments?);
    tracker.update(Fragment::FunctionLibs, version_function_libs_fragment(version)?);
    Ok(tracker)
}

/// The assembled toolbox, or the categories still missing.
fn complete_toolbox(tracker: &ToolboxTracker) -> Result<&CompositeToolbox, Failure> {
    tracker.latest().ok_or_else(|| Failure::IncompleteToolbox {
        missing: tracker.missing(),
    })
}

/// Opens an editor session on `version` with its full toolbox.
async fn open_session(
    cache: &Cache,
    interface: InterfaceId,
    version: &VersionRecord,
) -> Result<EditorSession<XmlWorkspaceLibrary>, Failure> {
    let tracker = build_toolbox(cache, interface, version).await?;
    let mut session =
        EditorSession::with_tracker(tracker, XmlWorkspaceLibrary::new(), "editor".to_string());
    let event = session.load_program(version.program_text().map(str::to_string))?;
    tracing::debug!("editor session: {:?}", event);
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_toolbox_is_a_failure() {
        let mut tracker = ToolboxTracker::new();
        tracker.update(Fragment::References, "<category name=\"References\"></category>");

        let failure = complete_toolbox(&tracker).err().unwrap();
        assert!(matches!(
            &failure,
            Failure::IncompleteToolbox { missing } if missing == &vec![Fragment::ArgumentFields]
        ));
        assert_eq!(failure.exit_code(), 1);

        tracker.update(Fragment::ArgumentFields, "<category name=\"Arguments\"></category>");
        assert!(complete_toolbox(&tracker).is_ok());
    }

    #[test]
    fn client_errors_map_to_exit_codes() {
        let not_found = Failure::Client(ClientError::NotFound {
            kind: "version",
            id: "77".to_string(),
        });
        assert_eq!(not_found.exit_code(), 2);

        let transport = Failure::Client(ClientError::Transport(
            bizlogic_client::TransportError::Status {
                url: "/rest/program".to_string(),
                status: 500,
                body: String::new(),
            },
        ));
        assert_eq!(transport.exit_code(), 3);

        assert_eq!(Failure::Workspace(WorkspaceError::NotReady).exit_code(), 1);
    }
}
