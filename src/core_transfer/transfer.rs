use crate::constants::LINE_ENDING;
use log::{debug, error};
use tokio::io::{self, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Copies `reader` into `writer` through a buffer of `buffer_size` bytes.
pub async fn copy_stream<R, W>(reader: &mut R, writer: &mut W, buffer_size: usize) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0; buffer_size.max(1)];
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                error!("Error reading during transfer: {}", e);
                return Err(e);
            }
        };

        if let Err(e) = writer.write_all(&buffer[..bytes_read]).await {
            error!("Error writing during transfer: {}", e);
            return Err(e);
        }
        total += bytes_read as u64;
    }

    writer.flush().await?;
    Ok(total)
}

/// Streams a file to the data connection, then closes our side of it.
pub async fn send_file<R, W>(file: &mut R, data_stream: &mut W, buffer_size: usize) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let sent = copy_stream(file, data_stream, buffer_size).await?;
    data_stream.shutdown().await?;
    debug!("Sent {} bytes", sent);
    Ok(sent)
}

/// Reads the data connection until the client closes it.
pub async fn receive_file<R, W>(data_stream: &mut R, file: &mut W, buffer_size: usize) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let received = copy_stream(data_stream, file, buffer_size).await?;
    debug!("Received {} bytes", received);
    Ok(received)
}

/// Writes one line per entry, each terminated by CRLF.
pub async fn send_listing<W>(data_stream: &mut W, lines: &[String]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut listing = String::new();
    for line in lines {
        listing.push_str(line);
        listing.push_str(LINE_ENDING);
    }

    data_stream.write_all(listing.as_bytes()).await?;
    data_stream.flush().await?;
    data_stream.shutdown().await?;
    Ok(())
}
