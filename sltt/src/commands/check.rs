//! Check command implementation.
//!
//! Runs the translation pipeline over a set of input files without writing
//! any output, surfacing parse/translate diagnostics so a project can be
//! validated in CI or a pre-commit hook without touching the filesystem.

use std::path::PathBuf;
use std::time::Instant;

use sltc_drv::{Config as DriverConfig, EmitStage, Session};

use crate::commands::common::error_messages;
use crate::commands::traits::{Command, CommandDescription};
use crate::config::Config;
use crate::error::{Result, SlttError};

/// Arguments for the check command.
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Input source files to validate.
    pub input: Vec<PathBuf>,
    /// Escalate warnings to hard failures.
    pub warnings_as_errors: bool,
}

impl Default for CheckArgs {
    fn default() -> Self {
        Self {
            verbose: false,
            input: Vec::new(),
            warnings_as_errors: false,
        }
    }
}

/// Check command handler.
pub struct CheckCommand {
    args: CheckArgs,
    config: Config,
}

impl CheckCommand {
    /// Create a new CheckCommand.
    pub fn new(args: CheckArgs) -> Self {
        Self {
            args,
            config: Config::default(),
        }
    }

    /// Execute the command.
    pub fn run(&self) -> Result<()> {
        let start_time = Instant::now();
        self.validate_input_files()?;

        let config = DriverConfig {
            input_files: self.args.input.clone(),
            output_dir: None,
            emit: EmitStage::Tl,
            support_class_name: self.config.translate.support_class_name.clone(),
            name_rewrite: self.config.translate.name_rewrite()?,
            verbose: self.args.verbose,
            warnings_as_errors: self.args.warnings_as_errors || self.config.translate.warnings_as_errors,
            ..DriverConfig::default()
        };

        let file_count = config.input_files.len();
        let mut session = Session::new(config);
        session.translate().map_err(SlttError::from)?;

        self.log_success(start_time.elapsed(), file_count);
        Ok(())
    }

    /// Validate that input files are provided.
    fn validate_input_files(&self) -> Result<()> {
        if self.args.input.is_empty() {
            return Err(SlttError::Validation(
                error_messages::NO_INPUT_FILES.to_string(),
            ));
        }
        Ok(())
    }

    fn log_success(&self, elapsed: std::time::Duration, file_count: usize) {
        if self.args.verbose {
            eprintln!("checked {file_count} file(s) in {:.2}s", elapsed.as_secs_f64());
        }
        println!("ok: {file_count} file(s) translate cleanly");
    }
}

impl Command for CheckCommand {
    type Args = CheckArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self {
            args,
            config: Config::default(),
        }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "check"
    }
}

impl CommandDescription for CheckCommand {
    fn description() -> &'static str {
        "Validate that SL source files translate without errors"
    }

    fn help() -> &'static str {
        "Runs the translation pipeline over the given input files without \
         writing any output, reporting any lex, parse, or translation \
         errors encountered."
    }
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<()> {
    let command = CheckCommand::new(args);
    command.run()
}
