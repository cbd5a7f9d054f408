// src/client.rs

//! Host-side client for a running bridge.
//!
//! Speaks the line protocol over any `BufRead`/`Write` pair, or over the
//! stdio of a spawned bridge process.

use std::ffi::OsStr;
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command as Process, Stdio};

use log::{debug, warn};

use crate::common::{
    parse_response, Command, ErrorCode, MeasurementSample, Response, ResponseParseError,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("I/O error talking to bridge: {0}")]
    Io(#[from] io::Error),

    /// Stream closed, or the bridge said `BYE` when it should not have.
    #[error("bridge disconnected")]
    Disconnected,

    #[error("bridge start-up failed: {code} {detail:?}")]
    InitFailed { code: ErrorCode, detail: Option<i32> },

    #[error("bridge reported {code} {detail:?}")]
    Bridge { code: ErrorCode, detail: Option<i32> },

    /// `DATA` arrived but without all required status bits.
    #[error("sample status {0:#04x} incomplete")]
    Incomplete(u8),

    #[error("unparseable bridge line {line:?}: {source}")]
    Parse { line: String, source: ResponseParseError },

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// A connected bridge session.
#[derive(Debug)]
pub struct BridgeClient<R, W>
where
    R: BufRead,
    W: Write,
{
    reader: R,
    writer: W,
    line: String,
}

impl<R, W> BridgeClient<R, W>
where
    R: BufRead,
    W: Write,
{
    /// Waits for `READY`. Informational lines before it are skipped; an
    /// `ERR` banner means the bridge failed to start.
    pub fn connect(reader: R, writer: W) -> Result<Self, ClientError> {
        let mut client = BridgeClient { reader, writer, line: String::new() };
        loop {
            let banner = parse_response(client.read_line()?);
            match banner {
                Ok(Response::Ready) => return Ok(client),
                Ok(Response::Error { code, detail }) => {
                    return Err(ClientError::InitFailed { code, detail });
                }
                _ => debug!("skipping banner {:?}", client.line.trim_end()),
            }
        }
    }

    pub fn ping(&mut self) -> Result<(), ClientError> {
        match self.request(&Command::Ping)? {
            Response::Pong => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Runs one measurement step on the bridge.
    pub fn measure(&mut self, temp_c: i32, duration_ms: i32) -> Result<MeasurementSample, ClientError> {
        match self.request(&Command::Measure { temp_c, duration_ms })? {
            Response::Data(sample) if sample.status.is_complete() => Ok(sample),
            Response::Data(sample) => {
                warn!("bridge returned measurement with status {}", sample.status);
                Err(ClientError::Incomplete(sample.status.bits()))
            }
            Response::Error { code, detail } => {
                warn!("measurement error for temp={} dur={}: {} {:?}", temp_c, duration_ms, code, detail);
                Err(ClientError::Bridge { code, detail })
            }
            other => Err(self.unexpected(other)),
        }
    }

    /// Sends `EXIT` and waits for `BYE`. Failures are ignored: the bridge
    /// may already be gone.
    pub fn close(mut self) -> (R, W) {
        if let Err(e) = self.request(&Command::Exit) {
            debug!("close: {}", e);
        }
        (self.reader, self.writer)
    }

    fn request(&mut self, command: &Command) -> Result<Response, ClientError> {
        let line = command
            .format_into()
            .map_err(|_| io::Error::other("command does not fit in a line"))?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;

        let reply = self.read_line()?;
        parse_response(reply).map_err(|source| ClientError::Parse {
            line: reply.trim_end().to_owned(),
            source,
        })
    }

    fn read_line(&mut self) -> Result<&str, ClientError> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Err(ClientError::Disconnected);
        }
        Ok(&self.line)
    }

    fn unexpected(&self, response: Response) -> ClientError {
        match response {
            Response::Bye => ClientError::Disconnected,
            other => ClientError::Unexpected(other.to_string()),
        }
    }
}

/// Client over the stdio of a child bridge process.
pub type ProcessClient = BridgeClient<BufReader<ChildStdout>, ChildStdin>;

/// Launches the bridge executable at `program` and connects to it.
///
/// The child's stderr (its log output) is discarded.
pub fn spawn<S: AsRef<OsStr>>(program: S) -> Result<(Child, ProcessClient), ClientError> {
    let mut child = Process::new(program)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
        (Some(stdin), Some(stdout)) => (stdin, stdout),
        _ => return Err(ClientError::Disconnected),
    };

    match BridgeClient::connect(BufReader::new(stdout), stdin) {
        Ok(client) => Ok((child, client)),
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            Err(e)
        }
    }
}
