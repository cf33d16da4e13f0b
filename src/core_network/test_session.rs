// End-to-end tests driving real control and data connections
use crate::constants::MAX_COMMAND_LINE;
use crate::core_ftpcommand::test_utils::test_context;
use crate::core_network::network::serve;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};

async fn start_server(root: &Path) -> SocketAddr {
    let context = Arc::new(test_context(root));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, context));
    addr
}

struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, writer) = stream.into_split();
        let mut client = Self {
            reader: BufReader::new(read_half),
            writer,
        };
        let greeting = client.read_reply().await;
        assert!(greeting.starts_with("220 "), "greeting: {:?}", greeting);
        client
    }

    async fn read_line(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).await.unwrap();
        line
    }

    /// Reads one reply, following multi-line blocks to their closing line.
    async fn read_reply(&mut self) -> String {
        let first = self.read_line().await;
        assert!(first.ends_with("\r\n"), "unterminated reply: {:?}", first);
        if first.as_bytes().get(3) != Some(&b'-') {
            return first;
        }

        let closing = format!("{} ", &first[..3]);
        let mut reply = first;
        loop {
            let line = self.read_line().await;
            reply.push_str(&line);
            if line.starts_with(&closing) {
                return reply;
            }
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .unwrap();
    }

    async fn command(&mut self, line: &str) -> String {
        self.send(line).await;
        self.read_reply().await
    }

    async fn login(&mut self) {
        assert!(self.command("USER user").await.starts_with("331 "));
        assert!(self.command("PASS password").await.starts_with("230 "));
    }

    async fn pasv(&mut self) -> SocketAddr {
        let reply = self.command("PASV").await;
        assert!(reply.starts_with("227 "), "PASV reply: {:?}", reply);
        let start = reply.find('(').unwrap() + 1;
        let end = reply.find(')').unwrap();
        let fields: Vec<u16> = reply[start..end]
            .split(',')
            .map(|f| f.parse().unwrap())
            .collect();
        let ip = Ipv4Addr::new(
            fields[0] as u8,
            fields[1] as u8,
            fields[2] as u8,
            fields[3] as u8,
        );
        SocketAddr::from((ip, fields[4] * 256 + fields[5]))
    }

    /// Runs a download-style command over a fresh passive connection.
    async fn fetch(&mut self, command: &str) -> (Vec<u8>, String) {
        let data_addr = self.pasv().await;
        let mut data = TcpStream::connect(data_addr).await.unwrap();
        let opening = self.command(command).await;
        assert!(opening.starts_with("150 "), "{}: {:?}", command, opening);

        let mut received = Vec::new();
        data.read_to_end(&mut received).await.unwrap();
        (received, self.read_reply().await)
    }
}

#[tokio::test]
async fn test_commands_before_login() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path()).await;
    let mut client = TestClient::connect(addr).await;

    assert_eq!(client.command("HELLO there").await, "500 Unknown command.\r\n");
    assert_eq!(client.command("").await, "500 Unknown command.\r\n");
    assert!(client.command("FEAT").await.starts_with("211-Features:\r\n"));

    for gated in ["PWD", "CWD /", "PASV", "EPSV", "PORT 127,0,0,1,31,144", "LIST", "RETR a", "STOR a", "TYPE I"] {
        assert_eq!(client.command(gated).await, "530 Please log in.\r\n", "{}", gated);
    }

    assert_eq!(client.command("quit").await, "221 Goodbye.\r\n");
    assert_eq!(client.read_line().await, "");
}

#[tokio::test]
async fn test_gated_commands_have_no_effect_before_login() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let addr = start_server(dir.path()).await;
    let mut client = TestClient::connect(addr).await;

    let data_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = data_listener.local_addr().unwrap().port();
    let port_arg = format!("PORT 127,0,0,1,{},{}", port / 256, port % 256);
    assert_eq!(client.command(&port_arg).await, "530 Please log in.\r\n");
    assert_eq!(client.command("STOR x").await, "530 Please log in.\r\n");
    assert_eq!(client.command("CWD sub").await, "530 Please log in.\r\n");

    client.login().await;
    assert!(!dir.path().join("x").exists());
    assert_eq!(
        client.command("PWD").await,
        "257 \"/\" is the current directory.\r\n"
    );
    assert_eq!(
        client.command("LIST").await,
        "425 Can't open data connection.\r\n"
    );

    let dialed = tokio::time::timeout(Duration::from_millis(100), data_listener.accept()).await;
    assert!(dialed.is_err(), "server dialed the unauthenticated PORT address");
}

#[tokio::test]
async fn test_overlong_command_line_closes_session() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path()).await;
    let mut client = TestClient::connect(addr).await;

    client.writer.write_all(&vec![b'A'; MAX_COMMAND_LINE]).await.unwrap();
    assert_eq!(client.read_reply().await, "500 Command line too long.\r\n");
    assert_eq!(client.read_line().await, "");
}

#[tokio::test]
async fn test_login_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path()).await;
    let mut client = TestClient::connect(addr).await;

    assert!(client.command("PASS password").await.starts_with("530 "));
    assert_eq!(client.command("PWD").await, "530 Please log in.\r\n");

    assert!(client.command("USER user").await.starts_with("331 "));
    assert_eq!(client.command("PASS nope").await, "530 Login incorrect.\r\n");
    assert_eq!(client.command("PWD").await, "530 Please log in.\r\n");

    assert!(client.command("USER user").await.starts_with("331 "));
    assert!(client.command("PASS password").await.starts_with("230 "));
    assert_eq!(
        client.command("PWD").await,
        "257 \"/\" is the current directory.\r\n"
    );
    assert_eq!(client.command("SYST").await, "215 UNIX Type: L8\r\n");
    assert_eq!(client.command("TYPE I").await, "200 Type set to I.\r\n");
    assert!(client.command("TYPE X").await.starts_with("501 "));
}

#[tokio::test]
async fn test_directory_changes_stay_confined() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
    let addr = start_server(dir.path()).await;
    let mut client = TestClient::connect(addr).await;
    client.login().await;

    assert!(client.command("CWD a").await.starts_with("250 "));
    assert!(client.command("CWD b").await.starts_with("250 "));
    assert_eq!(
        client.command("PWD").await,
        "257 \"/a/b\" is the current directory.\r\n"
    );
    assert_eq!(client.command("CWD ../../..").await, "550 Permission denied.\r\n");
    assert_eq!(
        client.command("PWD").await,
        "257 \"/a/b\" is the current directory.\r\n"
    );

    assert!(client.command("CDUP").await.starts_with("250 "));
    assert!(client.command("CWD ..").await.starts_with("250 "));
    assert_eq!(client.command("CDUP").await, "550 Permission denied.\r\n");
    assert_eq!(client.command("CWD /a/../..").await, "550 Permission denied.\r\n");
    assert_eq!(client.command("CWD missing").await, "550 No such file or directory.\r\n");
    assert_eq!(
        client.command("PWD").await,
        "257 \"/\" is the current directory.\r\n"
    );
}

#[tokio::test]
async fn test_second_pasv_replaces_first() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path()).await;
    let mut client = TestClient::connect(addr).await;
    client.login().await;

    let first = client.pasv().await;
    let second = client.pasv().await;
    assert_ne!(first.port(), second.port());
    assert!(TcpStream::connect(first).await.is_err());

    let reply = client.command("EPSV").await;
    assert!(reply.starts_with("229 Entering Extended Passive Mode (|||"));
    assert!(TcpStream::connect(second).await.is_err());
}

#[tokio::test]
async fn test_retrieve_file() {
    let dir = tempfile::tempdir().unwrap();
    let content: Vec<u8> = (0..100_000u32).map(|i| (i % 253) as u8).collect();
    std::fs::write(dir.path().join("data.bin"), &content).unwrap();
    let addr = start_server(dir.path()).await;
    let mut client = TestClient::connect(addr).await;
    client.login().await;

    let (received, done) = client.fetch("RETR data.bin").await;
    assert_eq!(received.len(), content.len());
    assert_eq!(received, content);
    assert_eq!(done, "226 Transfer complete.\r\n");

    // The passive listener was consumed by the transfer
    assert_eq!(
        client.command("RETR data.bin").await,
        "425 Can't open data connection.\r\n"
    );
}

#[tokio::test]
async fn test_retrieve_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path()).await;
    let mut client = TestClient::connect(addr).await;
    client.login().await;

    let data_addr = client.pasv().await;
    assert_eq!(
        client.command("RETR missing.bin").await,
        "550 No such file or directory.\r\n"
    );
    assert!(TcpStream::connect(data_addr).await.is_err());
}

#[tokio::test]
async fn test_store_then_retrieve() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("up")).unwrap();
    let addr = start_server(dir.path()).await;
    let mut client = TestClient::connect(addr).await;
    client.login().await;
    assert!(client.command("CWD up").await.starts_with("250 "));

    let content: Vec<u8> = (0..50_000u32).map(|i| (i * 7 % 256) as u8).collect();
    let data_addr = client.pasv().await;
    let mut data = TcpStream::connect(data_addr).await.unwrap();
    let opening = client.command("STOR holiday photo.jpg").await;
    assert!(opening.starts_with("150 "), "{:?}", opening);
    data.write_all(&content).await.unwrap();
    data.shutdown().await.unwrap();
    drop(data);
    assert_eq!(client.read_reply().await, "226 Transfer complete.\r\n");

    assert_eq!(
        std::fs::read(dir.path().join("up/holiday photo.jpg")).unwrap(),
        content
    );

    let (received, done) = client.fetch("RETR /up/holiday photo.jpg").await;
    assert_eq!(received, content);
    assert_eq!(done, "226 Transfer complete.\r\n");
}

#[tokio::test]
async fn test_listings() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.txt"), b"bb").unwrap();
    std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
    std::fs::create_dir(dir.path().join("empty")).unwrap();
    let addr = start_server(dir.path()).await;
    let mut client = TestClient::connect(addr).await;
    client.login().await;

    let (names, done) = client.fetch("NLST").await;
    assert_eq!(String::from_utf8(names).unwrap(), "a.txt\r\nb.txt\r\nempty\r\n");
    assert_eq!(done, "226 Directory send OK.\r\n");

    let (long, done) = client.fetch("LIST -la").await;
    let long = String::from_utf8(long).unwrap();
    assert!(long.ends_with("\r\n"));
    let lines: Vec<&str> = long.trim_end_matches("\r\n").split("\r\n").collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with('-') && lines[0].ends_with(" a.txt"));
    assert!(lines[2].starts_with('d') && lines[2].ends_with(" empty"));
    assert_eq!(done, "226 Directory send OK.\r\n");

    assert!(client.command("CWD empty").await.starts_with("250 "));
    let (nothing, done) = client.fetch("LIST").await;
    assert!(nothing.is_empty());
    assert_eq!(done, "226 Directory send OK.\r\n");
}

#[tokio::test]
async fn test_active_mode_listing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("only.txt"), b"x").unwrap();
    let addr = start_server(dir.path()).await;
    let mut client = TestClient::connect(addr).await;
    client.login().await;

    let data_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = data_listener.local_addr().unwrap().port();
    let reply = client
        .command(&format!("PORT 127,0,0,1,{},{}", port / 256, port % 256))
        .await;
    assert_eq!(reply, "200 PORT command successful.\r\n");

    client.send("NLST").await;
    let (mut data, _) = data_listener.accept().await.unwrap();
    assert!(client.read_reply().await.starts_with("150 "));
    let mut received = String::new();
    data.read_to_string(&mut received).await.unwrap();
    assert_eq!(received, "only.txt\r\n");
    assert_eq!(client.read_reply().await, "226 Directory send OK.\r\n");
}

#[tokio::test]
async fn test_malformed_port_keeps_pending_mode() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("f"), b"").unwrap();
    let addr = start_server(dir.path()).await;
    let mut client = TestClient::connect(addr).await;
    client.login().await;

    let data_addr = client.pasv().await;
    assert!(client.command("PORT 127,0,0,1,31").await.starts_with("501 "));
    assert!(client.command("PORT 127,0,0,1,x,144").await.starts_with("501 "));

    let mut data = TcpStream::connect(data_addr).await.unwrap();
    assert!(client.command("NLST").await.starts_with("150 "));
    let mut received = String::new();
    data.read_to_string(&mut received).await.unwrap();
    assert_eq!(received, "f\r\n");
    assert_eq!(client.read_reply().await, "226 Directory send OK.\r\n");
}

#[tokio::test]
async fn test_aborted_download_keeps_session() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("big.bin"), vec![7u8; 16 * 1024 * 1024]).unwrap();
    let addr = start_server(dir.path()).await;
    let mut client = TestClient::connect(addr).await;
    client.login().await;

    let data_addr = client.pasv().await;
    let data = TcpStream::connect(data_addr).await.unwrap();
    assert!(client.command("RETR big.bin").await.starts_with("150 "));
    drop(data);

    assert_eq!(
        client.read_reply().await,
        "426 Connection closed; transfer aborted.\r\n"
    );
    assert_eq!(client.command("NOOP").await, "200 NOOP ok.\r\n");
}
