//! Session against a simulated module on the other end of a TCP socket.

use std::io;
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use xbeeprims::api::{
    ApiFrame, AtCommand, AtCommandResponse, AtCommandStatus, FrameData, ModemStatus,
    ModemStatusKind, Session, SessionConfig, SessionEvent, PRIMER,
};
use xbeeprims::frame::{FrameError, FrameWriter, StreamFramer};

const WAIT: Duration = Duration::from_secs(5);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Answers every AT command with its mnemonic echoed back as the value,
/// after announcing itself with a modem status frame.
fn spawn_module(stream: TcpStream) -> thread::JoinHandle<Vec<ApiFrame>> {
    thread::spawn(move || {
        let mut writer = FrameWriter::new(stream.try_clone().unwrap());
        let mut framer = StreamFramer::new(stream);
        let mut seen = Vec::new();

        writer
            .write_frame(&ModemStatus::from(ModemStatusKind::Joined).to_frame().unwrap())
            .unwrap();

        loop {
            let frames = match framer.read_frames() {
                Ok(frames) => frames,
                Err(FrameError::LinkClosed) => return seen,
                Err(FrameError::Io(e)) if e.kind() == io::ErrorKind::ConnectionReset => {
                    return seen
                }
                Err(e) => panic!("module read failed: {e}"),
            };
            for frame in frames {
                let api = ApiFrame::from_frame(&frame).unwrap();
                seen.push(api.clone());
                if let ApiFrame::AtCommand(cmd) = api {
                    let response = AtCommandResponse {
                        frame_id: cmd.frame_id,
                        params: Some(cmd.command.clone().into_bytes().into()),
                        command: cmd.command,
                        status: AtCommandStatus::Ok,
                    };
                    // The session may already be gone after its closing primer.
                    if writer.write_frame(&response.to_frame().unwrap()).is_err() {
                        return seen;
                    }
                }
            }
        }
    })
}

fn connect_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let client = TcpStream::connect(addr).unwrap();
    let (server, _) = listener.accept().unwrap();
    (client, server)
}

#[test]
fn at_commands_round_trip_through_module() {
    init_tracing();
    let (client, server) = connect_pair();
    let module = spawn_module(server);

    let (tx, rx) = mpsc::channel();
    let config = SessionConfig {
        prime_link: true,
        poll_interval: Some(Duration::from_millis(20)),
        ..SessionConfig::default()
    };
    let session = Session::from_link(
        client,
        move |event: SessionEvent| {
            let _ = tx.send(event);
        },
        config,
    )
    .unwrap();
    session.start().unwrap();

    let sent = session
        .send_frames(&[
            AtCommand::new(2, "NI").into(),
            AtCommand::new(3, "MY").into(),
        ])
        .unwrap();
    assert_eq!(sent, 2);

    let mut decoded = Vec::new();
    while decoded.len() < 4 {
        match rx.recv_timeout(WAIT).unwrap() {
            SessionEvent::Frame(frame) => decoded.push(ApiFrame::from_frame(&frame).unwrap()),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    assert!(matches!(
        &decoded[0],
        ApiFrame::ModemStatus(s) if s.kind() == Some(ModemStatusKind::Joined)
    ));
    // Reply to the primer, then the two queries in order.
    let replies: Vec<(u8, String)> = decoded[1..]
        .iter()
        .map(|api| match api {
            ApiFrame::AtCommandResponse(r) => (r.frame_id, r.command.clone()),
            other => panic!("unexpected frame: {other:?}"),
        })
        .collect();
    assert_eq!(
        replies,
        vec![(1, "AP".to_string()), (2, "NI".to_string()), (3, "MY".to_string())]
    );

    session.stop().unwrap();
    assert!(session.wait_stopped(WAIT));
    drop(session);

    let seen = module.join().unwrap();
    // Primer on start, then the two queries. The closing primer races the
    // hangup and may or may not have been read.
    assert!(seen.len() >= 3);
    assert_eq!(
        seen[0].to_frame().unwrap().serialize().as_ref(),
        PRIMER.as_slice()
    );
    assert!(matches!(&seen[1], ApiFrame::AtCommand(c) if c.command == "NI"));
    assert!(matches!(&seen[2], ApiFrame::AtCommand(c) if c.command == "MY"));
    assert!(seen[3..].iter().all(|api| *api == seen[0]));
}

#[test]
fn module_hangup_is_reported_once() {
    init_tracing();
    let (client, server) = connect_pair();

    let (tx, rx) = mpsc::channel();
    let session = Session::from_link(
        client,
        move |event: SessionEvent| {
            let _ = tx.send(event);
        },
        SessionConfig::default(),
    )
    .unwrap();
    session.start().unwrap();

    drop(server);
    assert!(matches!(rx.recv_timeout(WAIT).unwrap(), SessionEvent::Closed));
    assert!(session.wait_stopped(WAIT));
    assert!(!session.is_running());
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}
