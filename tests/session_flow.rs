//! End-to-end tests driving the server over real sockets against a
//! temporary directory root.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use uftpd::{Config, FtpServer, LogObserver, ServerHandle, ServerObserver};

struct TestServer {
    addr: SocketAddr,
    handle: ServerHandle,
    root: TempDir,
    task: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with_observer(Arc::new(LogObserver)).await
    }

    async fn start_with_observer(observer: Arc<dyn ServerObserver>) -> Self {
        let root = tempfile::tempdir().expect("create tempdir");
        let mut config = Config::default();
        config.server.listen_address = "127.0.0.1".to_string();
        config.server.listen_port = 0;
        config.server.start_dir = root.path().to_str().expect("utf-8 path").to_string();

        let server = FtpServer::bind(config, observer)
            .await
            .expect("bind server");
        let addr = server.local_addr().expect("local addr");
        let handle = server.handle();
        let task = tokio::spawn(server.run());

        Self {
            addr,
            handle,
            root,
            task,
        }
    }

    fn root(&self) -> &Path {
        self.root.path()
    }

    async fn stop(self) {
        self.handle.stop();
        let _ = self.task.await;
    }
}

struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let socket = TcpStream::connect(addr).await.expect("connect");
        let (read_half, write_half) = socket.into_split();
        let mut client = Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        };

        let greeting = client.read_reply().await;
        assert!(greeting.starts_with("220"), "greeting was {greeting:?}");
        client
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\r\n").as_bytes())
            .await
            .expect("send command");
    }

    async fn read_reply(&mut self) -> String {
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .await
            .expect("read reply");
        assert!(n > 0, "server closed the control connection");
        line
    }

    async fn cmd(&mut self, line: &str) -> String {
        self.send(line).await;
        self.read_reply().await
    }

    async fn login(&mut self) {
        let reply = self.cmd("USER alice").await;
        assert!(reply.starts_with("331"), "USER reply was {reply:?}");
        let reply = self.cmd("PASS secret").await;
        assert!(reply.starts_with("230"), "PASS reply was {reply:?}");
    }

    /// Opens a local listener for active-mode transfers and points the
    /// session at it with PORT.
    async fn setup_data_listener(&mut self) -> TcpListener {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind data");
        let port = listener.local_addr().expect("data addr").port();
        let reply = self
            .cmd(&format!("PORT 127,0,0,1,{},{}", port >> 8, port & 0xff))
            .await;
        assert!(reply.starts_with("200"), "PORT reply was {reply:?}");
        listener
    }
}

#[tokio::test]
async fn login_handshake() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;

    let reply = client.cmd("USER alice").await;
    assert!(reply.starts_with("331"));
    let reply = client.cmd("PASS whatever").await;
    assert!(reply.starts_with("230"));

    server.stop().await;
}

#[tokio::test]
async fn commands_before_login_are_refused() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;

    // Identifying phase: everything but USER gets a 530.
    assert!(client.cmd("PWD").await.starts_with("530"));
    assert!(client.cmd("MKD sub").await.starts_with("530"));
    assert!(!server.root().join("sub").exists());

    // Authenticating phase: everything but PASS gets a 530.
    assert!(client.cmd("USER alice").await.starts_with("331"));
    assert!(client.cmd("CWD /").await.starts_with("530"));

    server.stop().await;
}

#[tokio::test]
async fn pwd_reports_the_start_directory() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;
    client.login().await;

    let reply = client.cmd("PWD").await;
    let expected = format!("257 \"{}\"", server.root().display());
    assert!(reply.starts_with(&expected), "PWD reply was {reply:?}");

    server.stop().await;
}

#[tokio::test]
async fn mkd_cwd_pwd_roundtrip() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;
    client.login().await;

    assert!(client.cmd("MKD sub").await.starts_with("250"));
    assert!(server.root().join("sub").is_dir());
    assert!(client.cmd("CWD sub").await.starts_with("200"));

    let reply = client.cmd("PWD").await;
    let expected = format!("257 \"{}\"", server.root().join("sub").display());
    assert!(reply.starts_with(&expected), "PWD reply was {reply:?}");

    // CDUP is CWD ".." and removes exactly one segment.
    assert!(client.cmd("CDUP").await.starts_with("200"));
    let reply = client.cmd("PWD").await;
    let expected = format!("257 \"{}\"", server.root().display());
    assert!(reply.starts_with(&expected), "PWD reply was {reply:?}");

    server.stop().await;
}

#[tokio::test]
async fn cwd_to_a_missing_directory_leaves_cwd_unchanged() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;
    client.login().await;

    assert!(client.cmd("CWD nope").await.starts_with("431"));
    let reply = client.cmd("PWD").await;
    let expected = format!("257 \"{}\"", server.root().display());
    assert!(reply.starts_with(&expected), "PWD reply was {reply:?}");

    server.stop().await;
}

#[tokio::test]
async fn rename_flow() {
    let server = TestServer::start().await;
    std::fs::write(server.root().join("old.txt"), b"payload").expect("seed file");

    let mut client = Client::connect(server.addr).await;
    client.login().await;

    assert!(client.cmd("RNFR old.txt").await.starts_with("350"));
    assert!(client.cmd("RNTO new.txt").await.starts_with("250"));
    assert!(!server.root().join("old.txt").exists());
    assert_eq!(
        std::fs::read(server.root().join("new.txt")).expect("renamed file"),
        b"payload"
    );

    // The pending source was consumed: RNTO alone is a sequencing error.
    assert!(client.cmd("RNTO again.txt").await.starts_with("503"));
    assert!(!server.root().join("again.txt").exists());

    server.stop().await;
}

#[tokio::test]
async fn rnto_without_rnfr_is_a_sequencing_error() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;
    client.login().await;

    assert!(client.cmd("RNTO x").await.starts_with("503"));
    assert!(!server.root().join("x").exists());

    server.stop().await;
}

#[tokio::test]
async fn delete_file_and_directory() {
    let server = TestServer::start().await;
    std::fs::write(server.root().join("junk.txt"), b"x").expect("seed file");
    std::fs::create_dir(server.root().join("junkdir")).expect("seed dir");

    let mut client = Client::connect(server.addr).await;
    client.login().await;

    assert!(client.cmd("DELE junk.txt").await.starts_with("250"));
    assert!(!server.root().join("junk.txt").exists());
    assert!(client.cmd("RMD junkdir").await.starts_with("250"));
    assert!(!server.root().join("junkdir").exists());

    // Deleting it again is a per-command failure, not a disconnect.
    assert!(client.cmd("DELE junk.txt").await.starts_with("550"));
    assert!(client.cmd("NOOP").await.starts_with("200"));

    server.stop().await;
}

#[tokio::test]
async fn stor_uploads_exact_bytes() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;
    client.login().await;

    let payload: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
    let listener = client.setup_data_listener().await;

    client.send("STOR f.bin").await;
    let (mut data, _) = listener.accept().await.expect("data connection");
    data.write_all(&payload).await.expect("send payload");
    drop(data);

    assert!(client.read_reply().await.starts_with("150"));
    assert!(client.read_reply().await.starts_with("226"));
    assert!(client.read_reply().await.starts_with("250"));

    let stored = std::fs::read(server.root().join("f.bin")).expect("stored file");
    assert_eq!(stored, payload);

    server.stop().await;
}

#[tokio::test]
async fn stor_then_retr_is_byte_identical() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;
    client.login().await;

    let payload: Vec<u8> = (0..=255u8).cycle().take(150_000).collect();
    let listener = client.setup_data_listener().await;

    client.send("STOR round.bin").await;
    let (mut data, _) = listener.accept().await.expect("data connection");
    data.write_all(&payload).await.expect("send payload");
    drop(data);
    assert!(client.read_reply().await.starts_with("150"));
    assert!(client.read_reply().await.starts_with("226"));
    assert!(client.read_reply().await.starts_with("250"));

    // Retrieve over a fresh data connection on the same PORT address.
    client.send("RETR round.bin").await;
    let (mut data, _) = listener.accept().await.expect("data connection");
    let mut received = Vec::new();
    data.read_to_end(&mut received).await.expect("read payload");
    assert!(client.read_reply().await.starts_with("150"));
    assert!(client.read_reply().await.starts_with("226"));
    assert!(client.read_reply().await.starts_with("250"));

    assert_eq!(received, payload);

    server.stop().await;
}

#[tokio::test]
async fn retr_of_a_missing_file_fails_without_a_transfer() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;
    client.login().await;

    // No data connection is attempted: the reply is an immediate 550.
    assert!(client.cmd("RETR missing.bin").await.starts_with("550"));
    assert!(client.cmd("NOOP").await.starts_with("200"));

    server.stop().await;
}

#[tokio::test]
async fn list_skips_hidden_entries() {
    let server = TestServer::start().await;
    std::fs::write(server.root().join("visible.txt"), b"data").expect("seed file");
    std::fs::write(server.root().join(".hidden"), b"data").expect("seed file");
    std::fs::create_dir(server.root().join("subdir")).expect("seed dir");

    let mut client = Client::connect(server.addr).await;
    client.login().await;
    let listener = client.setup_data_listener().await;

    client.send("LIST").await;
    let (mut data, _) = listener.accept().await.expect("data connection");
    let mut listing = String::new();
    data.read_to_string(&mut listing).await.expect("read listing");
    assert!(client.read_reply().await.starts_with("150"));
    assert!(client.read_reply().await.starts_with("226"));
    assert!(client.read_reply().await.starts_with("250"));

    assert!(listing.contains("visible.txt"));
    assert!(listing.contains("subdir"));
    assert!(!listing.contains(".hidden"));

    let dir_line = listing
        .lines()
        .find(|line| line.ends_with("subdir"))
        .expect("subdir line");
    assert!(dir_line.starts_with('d'));
    let file_line = listing
        .lines()
        .find(|line| line.ends_with("visible.txt"))
        .expect("file line");
    assert!(file_line.starts_with('-'));
    assert!(file_line.contains(" 4 "), "size missing in {file_line:?}");

    server.stop().await;
}

#[tokio::test]
async fn type_and_structure_codes() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;
    client.login().await;

    assert!(client.cmd("TYPE I").await.starts_with("200"));
    assert!(client.cmd("TYPE A").await.starts_with("500"));
    assert!(client.cmd("STRU F").await.starts_with("200"));
    assert!(client.cmd("STRU R").await.starts_with("500"));

    server.stop().await;
}

#[tokio::test]
async fn unknown_and_unimplemented_commands() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;
    client.login().await;

    // Unknown keyword and malformed PORT both parse to the invalid command.
    assert!(client.cmd("FROB it").await.starts_with("500"));
    assert!(client.cmd("PORT 1,2,3").await.starts_with("500"));

    // Recognized but unimplemented keywords get a 502 and the session
    // stays usable.
    assert!(client.cmd("APPE x").await.starts_with("502"));
    assert!(client.cmd("PASV").await.starts_with("502"));
    assert!(client.cmd("NOOP").await.starts_with("200"));

    server.stop().await;
}

#[tokio::test]
async fn garbled_command_line_keeps_the_session_alive() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;
    client.login().await;

    // Raw Telnet control bytes (IAC IP) are not UTF-8; the line is still
    // read, rejected as an invalid command, and the session survives.
    client
        .writer
        .write_all(b"\xff\xf4USER x\r\n")
        .await
        .expect("send garbled line");
    let reply = client.read_reply().await;
    assert!(reply.starts_with("500"), "garbled reply was {reply:?}");
    assert!(client.cmd("NOOP").await.starts_with("200"));

    server.stop().await;
}

/// Collects `error` events so tests can assert on what the engine reported.
#[derive(Default)]
struct RecordingObserver {
    errors: std::sync::Mutex<Vec<String>>,
}

impl ServerObserver for RecordingObserver {
    fn error(&self, detail: &str) {
        self.errors.lock().unwrap().push(detail.to_string());
    }
}

#[tokio::test]
async fn unimplemented_commands_are_reported_to_the_observer() {
    let observer = Arc::new(RecordingObserver::default());
    let server = TestServer::start_with_observer(Arc::clone(&observer) as _).await;
    let mut client = Client::connect(server.addr).await;
    client.login().await;

    assert!(client.cmd("APPE x").await.starts_with("502"));
    assert!(client.cmd("NOOP").await.starts_with("200"));

    {
        let errors = observer.errors.lock().unwrap();
        assert!(
            errors.iter().any(|e| e.contains("APPE")),
            "observer errors were {errors:?}"
        );
    }

    server.stop().await;
}

#[tokio::test]
async fn stop_disconnects_clients() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;
    client.login().await;

    server.handle.stop();
    let _ = server.task.await;

    // The control connection is gone: either EOF or a reset error.
    let mut line = String::new();
    match client.reader.read_line(&mut line).await {
        Ok(n) => assert_eq!(n, 0, "expected EOF, got {line:?}"),
        Err(_) => {}
    }
}
