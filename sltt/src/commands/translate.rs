//! Translate command implementation.
//!
//! This module drives the `sltc_drv` translation pipeline over a set of
//! input files, writing the translated target-language source to an output
//! directory (or stdout when none is given).

use std::path::{Path, PathBuf};
use std::time::Instant;

use sltc_drv::{render_lines, Config as DriverConfig, Session};

use crate::commands::common::{error_messages, EmitFormat};
use crate::commands::traits::{Command, CommandDescription};
use crate::config::Config;
use crate::error::{Result, SlttError};

/// Arguments for the translate command.
#[derive(Debug, Clone)]
pub struct TranslateArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Input source files to translate.
    pub input: Vec<PathBuf>,
    /// Output directory. Translated files print to stdout when absent.
    pub output: Option<PathBuf>,
    /// Stage to stop at: tokens, blocks, or tl.
    pub emit: Option<String>,
    /// Name of the runtime support class emitted calls route through.
    pub support_class: Option<String>,
    /// Identifier casing: lowercase or preserve.
    pub rewrite: Option<String>,
    /// Escalate warnings to hard failures.
    pub warnings_as_errors: bool,
}

impl Default for TranslateArgs {
    fn default() -> Self {
        Self {
            verbose: false,
            input: Vec::new(),
            output: None,
            emit: None,
            support_class: None,
            rewrite: None,
            warnings_as_errors: false,
        }
    }
}

/// Translate command handler.
pub struct TranslateCommand {
    args: TranslateArgs,
    config: Config,
}

impl TranslateCommand {
    /// Create a new TranslateCommand.
    pub fn new(args: TranslateArgs) -> Self {
        Self {
            args,
            config: Config::default(),
        }
    }

    /// Execute the command.
    pub fn run(&self) -> Result<()> {
        let start_time = Instant::now();
        self.validate_input_files()?;
        let emit = self.determine_emit_format()?;
        let driver_config = self.build_driver_config(emit)?;

        let mut session = Session::new(driver_config);
        let results = session.translate().map_err(SlttError::from)?;

        let written = self.write_results(&session, &results, emit)?;
        self.log_completion(start_time.elapsed(), written);

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

    /// Determine the emit stage, falling back to full TL translation.
    fn determine_emit_format(&self) -> Result<EmitFormat> {
        match &self.args.emit {
            Some(value) => EmitFormat::from_str(value).ok_or_else(|| {
                SlttError::Validation(format!("{} {}", error_messages::UNKNOWN_FORMAT, value))
            }),
            None => Ok(EmitFormat::Tl),
        }
    }

    /// Build the `sltc_drv::Config` driving this run from CLI args, falling
    /// back to the loaded `sltt.toml` configuration for unset fields.
    fn build_driver_config(&self, emit: EmitFormat) -> Result<DriverConfig> {
        let mut config = DriverConfig {
            input_files: self.args.input.clone(),
            output_dir: self.args.output.clone(),
            emit: emit.into(),
            verbose: self.args.verbose,
            ..DriverConfig::default()
        };

        config.support_class_name = self
            .args
            .support_class
            .clone()
            .unwrap_or_else(|| self.config.translate.support_class_name.clone());

        config.name_rewrite = match &self.args.rewrite {
            Some(value) => parse_name_rewrite(value)?,
            None => self.config.translate.name_rewrite()?,
        };

        config.warnings_as_errors = self.args.warnings_as_errors || self.config.translate.warnings_as_errors;

        Ok(config)
    }

    /// Write translated output, one file per input, returning how many were
    /// written (stdout counts as written for reporting purposes).
    fn write_results(
        &self,
        session: &Session,
        results: &sltc_drv::TranslationResults,
        emit: EmitFormat,
    ) -> Result<usize> {
        match emit {
            EmitFormat::Tokens => {
                for (file_id, tokens) in &results.tokens {
                    self.emit_one(session, *file_id, &format!("{:#?}", tokens), emit)?;
                }
                Ok(results.tokens.len())
            }
            EmitFormat::Blocks => {
                for (file_id, blocks) in &results.blocks {
                    self.emit_one(session, *file_id, &format!("{:#?}", blocks), emit)?;
                }
                Ok(results.blocks.len())
            }
            EmitFormat::Tl => {
                for (file_id, lines) in &results.tl {
                    let rendered = render_lines(lines);
                    self.emit_one(session, *file_id, &rendered, emit)?;
                }
                Ok(results.tl.len())
            }
        }
    }

    fn emit_one(
        &self,
        session: &Session,
        file_id: sltc_util::FileId,
        content: &str,
        emit: EmitFormat,
    ) -> Result<()> {
        match &self.args.output {
            None => {
                println!("{content}");
                Ok(())
            }
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                let source = session
                    .sources
                    .get(file_id)
                    .ok_or_else(|| SlttError::FileOperation(error_messages::INVALID_FILE_PATH.to_string()))?;
                let stem = Path::new(source.name())
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "output".to_string());
                let out_path = dir.join(format!("{stem}.{}", emit.extension()));
                if self.args.verbose {
                    eprintln!("translating: {} -> {}", source.name(), out_path.display());
                }
                std::fs::write(&out_path, content)?;
                Ok(())
            }
        }
    }

    fn log_completion(&self, elapsed: std::time::Duration, written: usize) {
        if !self.args.verbose {
            return;
        }
        eprintln!(
            "translation completed in {:.2}s",
            elapsed.as_secs_f64()
        );
        eprintln!("files: {written} translated");
    }
}

/// Parse a CLI-supplied rewrite string, sharing `TranslateConfig`'s rules.
fn parse_name_rewrite(value: &str) -> Result<sltc_drv::NameRewrite> {
    match value.to_lowercase().as_str() {
        "lowercase" => Ok(sltc_drv::NameRewrite::Lowercase),
        "preserve" => Ok(sltc_drv::NameRewrite::Preserve),
        other => Err(SlttError::Validation(format!(
            "unknown name rewrite '{other}', expected 'lowercase' or 'preserve'"
        ))),
    }
}

impl Command for TranslateCommand {
    type Args = TranslateArgs;
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
        "translate"
    }
}

impl CommandDescription for TranslateCommand {
    fn description() -> &'static str {
        "Translate SL source files into TL source"
    }

    fn help() -> &'static str {
        "Translates input SL source files into TL source, writing one \
         translated file per input to the output directory (or stdout \
         when no output directory is given)."
    }
}

/// Run the translate command.
pub fn run_translate(args: TranslateArgs) -> Result<()> {
    let command = TranslateCommand::new(args);
    command.run()
}
