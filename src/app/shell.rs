use crate::app::checker::{ScriptChecker, UploadForm};
use crate::app::render;
use crate::core::{Dispatcher, Encoding, Environment, Session, Storage};
use crate::utils::error::{CheckerError, Result};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
Commands:
  login <email>                 login with your work email
  logout                        end the session
  whoami                        show the logged-in email
  env <production|test>         choose the webhook environment
  method <standard|base64|binary>
                                choose how the file is uploaded
  submit <file> <title...>      upload a PDF or Word script for review
  payload <file> <title...>     preview the request without sending it
  ping                          test the webhook connection
  history                       list users who have logged in (admin)
  debug <on|off>                show raw status codes and errors
  help                          show this help
  quit                          leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line-oriented front end. Owns one `Session` for its lifetime.
pub struct Shell<S: Storage, D: Dispatcher> {
    checker: ScriptChecker<S, D>,
    session: Session,
    environment: Environment,
    encoding: Encoding,
}

impl<S: Storage, D: Dispatcher> Shell<S, D> {
    pub fn new(checker: ScriptChecker<S, D>) -> Self {
        Self {
            checker,
            session: Session::new(),
            environment: Environment::default(),
            encoding: Encoding::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "🎬 Script Checker")?;
        writeln!(
            out,
            "🔐 Login with your {} email (type 'help' for commands)",
            self.checker.gate().allowed_domain()
        )?;

        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if self.handle(&line, out).await? == Flow::Quit {
                break;
            }
        }

        Ok(())
    }

    /// Runs one command. User mistakes and dispatch failures are printed and
    /// never end the session; only IO errors on `out` propagate.
    pub async fn handle<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let result = match command.to_ascii_lowercase().as_str() {
            "" => Ok(()),
            "quit" | "exit" => return Ok(Flow::Quit),
            "help" => writeln!(out, "{}", HELP).map_err(CheckerError::from),
            "login" => self.login(rest, out).await,
            "logout" => {
                self.checker.logout(&mut self.session);
                writeln!(out, "Logged out.").map_err(CheckerError::from)
            }
            "whoami" => match &self.session.authenticated_email {
                Some(email) => writeln!(out, "👋 Welcome, {}", email).map_err(CheckerError::from),
                None => Err(CheckerError::NotLoggedIn),
            },
            "debug" => self.debug(rest, out),
            "env" => match rest.parse::<Environment>() {
                Ok(environment) => {
                    self.environment = environment;
                    writeln!(out, "Environment: {}", environment).map_err(CheckerError::from)
                }
                Err(message) => Err(CheckerError::ValidationError { message }),
            },
            "method" => match rest.parse::<Encoding>() {
                Ok(encoding) => {
                    self.encoding = encoding;
                    writeln!(out, "Upload Method: {}", encoding).map_err(CheckerError::from)
                }
                Err(message) => Err(CheckerError::ValidationError { message }),
            },
            "submit" => self.submit(rest, out).await,
            "payload" => self.payload(rest, out).await,
            "ping" => self.ping(out).await,
            "history" => self.history(out).await,
            other => writeln!(out, "Unknown command '{}'. Type 'help' for commands.", other)
                .map_err(CheckerError::from),
        };

        match result {
            Ok(()) => {}
            Err(e @ CheckerError::IoError(_)) => return Err(e),
            Err(e) => self.report(&e, out)?,
        }

        Ok(Flow::Continue)
    }

    async fn login<W: Write>(&mut self, email: &str, out: &mut W) -> Result<()> {
        if let Some(current) = &self.session.authenticated_email {
            writeln!(out, "Already logged in as {}. Use 'logout' first.", current)?;
            return Ok(());
        }

        self.checker.login(&mut self.session, email).await?;
        writeln!(out, "Logged in successfully!")?;
        writeln!(out, "👋 Welcome, {}", email)?;
        Ok(())
    }

    fn debug<W: Write>(&mut self, arg: &str, out: &mut W) -> Result<()> {
        self.session.debug_enabled = match arg.to_ascii_lowercase().as_str() {
            "on" | "true" | "1" => true,
            "off" | "false" | "0" => false,
            "" => !self.session.debug_enabled,
            other => {
                return Err(CheckerError::ValidationError {
                    message: format!("Expected 'on' or 'off', got '{}'", other),
                })
            }
        };
        let state = if self.session.debug_enabled { "enabled" } else { "disabled" };
        writeln!(out, "Debug mode {}.", state)?;
        Ok(())
    }

    fn form(&self, args: &str) -> UploadForm {
        let (file, title) = match args.split_once(char::is_whitespace) {
            Some((file, title)) => (file, title.trim()),
            None => (args, ""),
        };

        UploadForm {
            title: title.to_string(),
            file: (!file.is_empty()).then(|| PathBuf::from(file)),
            environment: self.environment,
            encoding: self.encoding,
        }
    }

    async fn submit<W: Write>(&mut self, args: &str, out: &mut W) -> Result<()> {
        let form = self.form(args);
        writeln!(out, "⏳ Processing your script...")?;
        let outcome = self.checker.submit(&self.session, &form).await?;
        for line in render::submission_lines(&outcome, &form.title, self.session.debug_enabled) {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    async fn payload<W: Write>(&mut self, args: &str, out: &mut W) -> Result<()> {
        let form = self.form(args);
        let preview = self.checker.payload_preview(&self.session, &form).await?;
        writeln!(out, "🔍 Generated Test Payload:")?;
        writeln!(out, "{}", preview)?;
        Ok(())
    }

    async fn ping<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if !self.session.is_authenticated() {
            return Err(CheckerError::NotLoggedIn);
        }

        writeln!(out, "🔍 Testing Webhook Connection...")?;
        match self.checker.ping(self.environment).await {
            Ok(report) => {
                for line in render::ping_lines(&report) {
                    writeln!(out, "{}", line)?;
                }
            }
            Err(e) => writeln!(out, "Connection test failed: {}", e)?,
        }
        Ok(())
    }

    async fn history<W: Write>(&mut self, out: &mut W) -> Result<()> {
        match self.checker.login_history(&self.session).await {
            Ok(emails) => {
                for line in render::history_lines(&emails) {
                    writeln!(out, "{}", line)?;
                }
                Ok(())
            }
            Err(e @ (CheckerError::NotLoggedIn | CheckerError::Forbidden { .. })) => Err(e),
            Err(e) => {
                tracing::warn!("Couldn't load login data: {}", e);
                writeln!(out, "Couldn't load login data.")?;
                if self.session.debug_enabled {
                    writeln!(out, "{}", e)?;
                }
                Ok(())
            }
        }
    }

    fn report<W: Write>(&self, error: &CheckerError, out: &mut W) -> Result<()> {
        tracing::debug!("Command failed: {}", error);
        writeln!(out, "{}", error.user_friendly_message())?;
        if self.session.debug_enabled {
            writeln!(out, "Debug Info: {}", error)?;
        }
        Ok(())
    }
}
