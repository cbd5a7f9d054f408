// src/bridge/io_loop.rs

use std::io::{self, BufRead, Write};
use std::string::String;
use std::vec::Vec;

use log::{debug, info, warn};

use super::session::{Bridge, Flow};
use crate::common::{
    error::BridgeError,
    hal_traits::{BoardTransport, Bme69xDriver},
    response::Response,
};

/// How a session that started successfully came to an end.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// `EXIT` received and answered.
    Exit,
    /// Input stream closed.
    EndOfInput,
}

/// Writes one response as a single complete line, then flushes.
pub fn write_response<W: Write>(output: &mut W, response: &Response) -> io::Result<()> {
    let line = response
        .format_into()
        .map_err(|_| io::Error::other("response does not fit in a line"))?;
    output.write_all(line.as_bytes())?;
    output.flush()
}

impl<D, B> Bridge<D, B>
where
    D: Bme69xDriver,
    B: BoardTransport,
{
    /// Runs a whole session: start-up, `READY`, then one response per
    /// command line until `EXIT` or end of input.
    ///
    /// A failed start-up writes `ERR INIT <code>` and returns
    /// `BridgeError::Init`. The board is released when `self` is dropped at
    /// the end of this call, whichever way it returns.
    pub fn run<R, W>(mut self, mut input: R, mut output: W) -> Result<SessionEnd, BridgeError<io::Error>>
    where
        R: BufRead,
        W: Write,
    {
        if let Err(e) = self.initialise() {
            warn!("{}", e);
            write_response(&mut output, &Response::from(e)).map_err(BridgeError::Io)?;
            return Err(BridgeError::Init(e));
        }
        write_response(&mut output, &Response::Ready).map_err(BridgeError::Io)?;

        let mut raw = Vec::new();
        loop {
            raw.clear();
            let n = input.read_until(b'\n', &mut raw).map_err(BridgeError::Io)?;
            if n == 0 {
                info!("input closed, ending session");
                return Ok(SessionEnd::EndOfInput);
            }

            let line = String::from_utf8_lossy(&raw);
            let (response, flow) = self.handle_line(&line);
            match response {
                Some(response) => {
                    write_response(&mut output, &response).map_err(BridgeError::Io)?;
                }
                None => debug!("ignoring blank line"),
            }

            if flow == Flow::Exit {
                info!("EXIT received, ending session");
                return Ok(SessionEnd::Exit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::mock::{mock_pair, MockState, SharedState};
    use crate::bridge::session::BridgeSettings;
    use crate::common::{DriverCode, StatusFlags};
    use std::io::Cursor;

    fn run_script(script: &str, state_setup: impl FnOnce(&SharedState)) -> (Result<SessionEnd, BridgeError<io::Error>>, String, SharedState) {
        let (driver, board, state) = mock_pair();
        state_setup(&state);
        let bridge = Bridge::new(driver, board, BridgeSettings::default());
        let mut out = Vec::new();
        let result = bridge.run(Cursor::new(script.as_bytes()), &mut out);
        (result, String::from_utf8(out).unwrap(), state)
    }

    fn lines(output: &str) -> Vec<&str> {
        output.lines().collect()
    }

    #[test]
    fn test_ready_then_ping_exit() {
        let (result, out, state) = run_script("PING\nEXIT\n", |_| {});
        assert_eq!(result.unwrap(), SessionEnd::Exit);
        assert_eq!(lines(&out), ["READY", "PONG", "BYE"]);
        assert_eq!(state.borrow().deinit_count, 1);
    }

    #[test]
    fn test_responses_follow_command_order() {
        let (result, out, _) = run_script("PING\nMEASURE 300 150\nPING\n", |_| {});
        assert_eq!(result.unwrap(), SessionEnd::EndOfInput);
        let out = lines(&out);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], "READY");
        assert_eq!(out[1], "PONG");
        assert!(out[2].starts_with("DATA "));
        assert_eq!(out[3], "PONG");
    }

    #[test]
    fn test_data_line_format() {
        let (_, out, _) = run_script("MEASURE 300 150\n", |_| {});
        // clock starts at 1000 ms and advances by the 249 ms wait
        assert_eq!(lines(&out)[1], "DATA 1249 24.50 100812.50 45.25 12345.75 0xb0");
    }

    #[test]
    fn test_range_errors() {
        let script = "MEASURE 99 150\nMEASURE 401 150\nMEASURE 300 0\nMEASURE 300 40001\n";
        let (_, out, _) = run_script(script, |_| {});
        assert_eq!(
            lines(&out),
            [
                "READY",
                "ERR TEMP_RANGE 99",
                "ERR TEMP_RANGE 401",
                "ERR DURATION_RANGE 0",
                "ERR DURATION_RANGE 40001",
            ]
        );
    }

    #[test]
    fn test_blank_lines_get_no_response() {
        let (_, out, _) = run_script("\n   \n\t\r\nPING\n", |_| {});
        assert_eq!(lines(&out), ["READY", "PONG"]);
    }

    #[test]
    fn test_bad_args_and_unknown() {
        let (_, out, _) = run_script("MEASURE 200\nHELLO\nPING\n", |_| {});
        assert_eq!(lines(&out), ["READY", "ERR MEASURE_ARGS", "ERR UNKNOWN_CMD", "PONG"]);
    }

    #[test]
    fn test_nothing_processed_after_exit() {
        let (result, out, state) = run_script("EXIT now please\nPING\nMEASURE 300 150\n", |_| {});
        assert_eq!(result.unwrap(), SessionEnd::Exit);
        assert_eq!(lines(&out), ["READY", "BYE"]);
        assert_eq!(MockState::count(&state, "get_data"), 0);
    }

    #[test]
    fn test_driver_errors_are_reported_and_session_continues() {
        let (_, out, _) = run_script("MEASURE 300 150\nPING\n", |state| {
            state.borrow_mut().n_fields = 0;
        });
        assert_eq!(lines(&out), ["READY", "ERR NO_DATA", "PONG"]);

        let (_, out, _) = run_script("MEASURE 300 150\nPING\n", |state| {
            state.borrow_mut().field.status = StatusFlags(0xA0);
        });
        assert_eq!(lines(&out), ["READY", "ERR STATUS 160", "PONG"]);

        let (_, out, _) = run_script("MEASURE 300 150\nPING\n", |state| {
            MockState::fail_on(state, "get_data", DriverCode::E_COM_FAIL);
        });
        assert_eq!(lines(&out), ["READY", "ERR GET_DATA -2", "PONG"]);
    }

    #[test]
    fn test_init_failure() {
        let (result, out, state) = run_script("PING\n", |state| {
            MockState::fail_on(state, "init", DriverCode::E_DEV_NOT_FOUND);
        });
        assert!(matches!(result, Err(BridgeError::Init(e)) if e.code == DriverCode::E_DEV_NOT_FOUND));
        assert_eq!(lines(&out), ["ERR INIT -3"]);
        assert_eq!(state.borrow().deinit_count, 1);
    }

    #[test]
    fn test_missing_final_newline() {
        let (result, out, _) = run_script("PING", |_| {});
        assert_eq!(result.unwrap(), SessionEnd::EndOfInput);
        assert_eq!(lines(&out), ["READY", "PONG"]);
    }

    #[test]
    fn test_invalid_utf8_is_unknown() {
        let (driver, board, _state) = mock_pair();
        let bridge = Bridge::new(driver, board, BridgeSettings::default());
        let mut out = Vec::new();
        let input: &[u8] = b"\xff\xfe\nPING\n";
        bridge.run(input, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "READY\nERR UNKNOWN_CMD\nPONG\n");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_output_failure_ends_session_and_releases_board() {
        let (driver, board, state) = mock_pair();
        let bridge = Bridge::new(driver, board, BridgeSettings::default());
        let result = bridge.run(Cursor::new("PING\n"), FailingWriter);
        assert!(matches!(result, Err(BridgeError::Io(ref e)) if e.kind() == io::ErrorKind::BrokenPipe));
        assert_eq!(state.borrow().deinit_count, 1);
    }
}
