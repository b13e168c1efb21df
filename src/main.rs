use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command as Process, ExitCode};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use modver::config::{DEFAULT_PATH_VAR, SessionConfig};
use modver::logging::{self, LogFormat};
use modver::session::{RepositoryRoots, ResolveAction, SessionManager};
use modver::session::resolver::{Resolver, check_module_name};
use modver::version::{Requirement, SatisfactionMode, VersionIdentifier};

#[derive(Parser)]
#[command(name = "modver")]
#[command(version, about = "Select installed module versions at runtime")]
struct Cli {
    /// Session config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two versions
    Compare { a: String, b: String },

    /// Check a version against requirements such as `>=1.0` or `!=1.2.0`
    Check {
        version: String,
        #[arg(required = true, allow_hyphen_values = true)]
        requirements: Vec<String>,
        /// Accept the version when any single requirement matches
        #[arg(long)]
        any: bool,
    },

    /// Print the installation directory of a module version
    Locate {
        module: String,
        version: String,
        /// Repository root, searched before the environment roots
        #[arg(long = "root")]
        roots: Vec<PathBuf>,
    },

    /// Activate module versions and run a command with them on the search path
    Exec {
        /// MODULE=VERSION to activate
        #[arg(long = "use", value_parser = parse_pair)]
        uses: Vec<(String, String)>,
        /// MODULE=REQUIREMENT to register before activation
        #[arg(long = "require", value_parser = parse_pair)]
        requires: Vec<(String, String)>,
        /// Absolute repository root to search first
        #[arg(long)]
        overlay: Vec<PathBuf>,
        /// Repository root to search last
        #[arg(long)]
        append: Vec<PathBuf>,
        /// Action on conflicting activations, overrides the config file
        #[arg(long, value_enum)]
        policy: Option<Policy>,
        /// Search path variable to prefix with the session workspace
        #[arg(long, default_value = DEFAULT_PATH_VAR)]
        path_var: String,
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Policy {
    Warn,
    Abort,
}

impl From<Policy> for ResolveAction {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Warn => ResolveAction::Warn,
            Policy::Abort => ResolveAction::Abort,
        }
    }
}

fn parse_pair(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((module, rest)) if !module.is_empty() && !rest.is_empty() => {
            Ok((module.to_string(), rest.to_string()))
        }
        _ => Err(format!("expected MODULE=VALUE, got '{value}'")),
    }
}

/// Interrupts received while a command was running under `exec`
static INTERRUPTS: AtomicUsize = AtomicUsize::new(0);

/// Keep SIGINT and SIGTERM from terminating modver before the session is closed.
///
/// Terminal interrupts reach the child as well, so `exec` returns once the
/// child exits and the workspace is removed as usual.
fn absorb_interrupts() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        INTERRUPTS.fetch_add(1, Ordering::SeqCst);
        info!("Interrupt received, waiting for the command to exit");
    })
    .context("failed to install interrupt handler")
}

/// Put `overlay` roots in front of the session roots and `append` roots after them
fn apply_roots(
    session: &mut SessionManager,
    overlay: Vec<PathBuf>,
    append: Vec<PathBuf>,
) -> anyhow::Result<()> {
    for root in overlay {
        if !session.overlay_repository_root(&root) {
            bail!("overlay root {} is not absolute", root.display());
        }
    }
    for root in append {
        session.append_repository_root(root);
    }
    Ok(())
}

/// Search path with `workspace` in front of the `existing` entries
fn search_path(workspace: &Path, existing: Option<OsString>) -> anyhow::Result<OsString> {
    match existing {
        Some(existing) if !existing.is_empty() => {
            let mut paths = vec![workspace.to_path_buf()];
            paths.extend(std::env::split_paths(&existing));
            std::env::join_paths(paths).context("failed to build search path")
        }
        _ => Ok(workspace.as_os_str().to_owned()),
    }
}

/// Exit code to pass on for a child's status code; 1 when it has none or it does not fit
fn exit_code(code: Option<i32>) -> u8 {
    code.and_then(|code| u8::try_from(code).ok()).unwrap_or(1)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.log_file.as_deref(), cli.log_format);

    let config = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::load_default()?,
    };

    match cli.command {
        Command::Compare { a, b } => {
            let a = VersionIdentifier::parse(&a)?;
            let b = VersionIdentifier::parse(&b)?;
            let ordering = match a.cmp(&b) {
                std::cmp::Ordering::Less => "less",
                std::cmp::Ordering::Equal => "equal",
                std::cmp::Ordering::Greater => "greater",
            };
            let compatibility = if a.compatible_with(&b) {
                "compatible"
            } else {
                "incompatible"
            };
            println!("{ordering} {compatibility}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Check {
            version,
            requirements,
            any,
        } => {
            let candidate = VersionIdentifier::parse(&version)?;
            let requirements = requirements
                .iter()
                .map(|text| Requirement::parse(text, "cli"))
                .collect::<Result<Vec<_>, _>>()?;
            let mode = if any {
                SatisfactionMode::Any
            } else {
                config.satisfaction
            };

            if mode.evaluate(&requirements, &candidate) {
                println!("{candidate} satisfies the requirements");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{candidate} does not satisfy the requirements");
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Locate {
            module,
            version,
            roots,
        } => {
            let mut search = RepositoryRoots::new(roots);
            for root in RepositoryRoots::from_env(&config.roots_env_var).as_slice() {
                search.append(root.clone());
            }
            check_module_name(&module)?;
            let version = VersionIdentifier::parse(&version)?;
            let path = Resolver.locate(&module, &version, search.as_slice())?;
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Exec {
            uses,
            requires,
            overlay,
            append,
            policy,
            path_var,
            command,
        } => {
            let mut config = config;
            if let Some(policy) = policy {
                config.resolve_action = policy.into();
            }
            run_exec(config, &uses, &requires, overlay, append, &path_var, &command)
        }
    }
}

fn run_exec(
    config: SessionConfig,
    uses: &[(String, String)],
    requires: &[(String, String)],
    overlay: Vec<PathBuf>,
    append: Vec<PathBuf>,
    path_var: &str,
    command: &[String],
) -> anyhow::Result<ExitCode> {
    let mut session = SessionManager::new(config)?;
    apply_roots(&mut session, overlay, append)?;

    for (module, requirement) in requires {
        session.register_requirement(module, requirement, "cli")?;
    }
    for (module, version) in uses {
        let activation = session.use_exact_version(module, version)?;
        info!(
            "Using {} from {:?}",
            activation.version.name(module),
            activation.path
        );
    }

    let Some((program, args)) = command.split_first() else {
        bail!("no command given");
    };
    let search_path = search_path(session.workspace_path(), std::env::var_os(path_var))?;

    absorb_interrupts()?;
    let status = Process::new(program)
        .args(args)
        .env(path_var, search_path)
        .status()
        .with_context(|| format!("failed to run {program}"));
    session.close()?;

    Ok(ExitCode::from(exit_code(status?.code())))
}
