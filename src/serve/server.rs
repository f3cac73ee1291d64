use crate::manifest::Manifest;
use crate::serve::routes::respond_to_request;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

/// Serve `manifest` on `addr` until the listener fails.
///
/// Every connection task shares the one read-only manifest.
pub async fn run(addr: SocketAddr, manifest: Manifest) -> Result<(), io::Error> {
    let manifest = Arc::new(manifest);
    log::info!("Binding to: {}", addr);
    let listener = TcpListener::bind(addr).await?;

    loop {
        let tcp = accept(&listener).await?;
        let manifest = Arc::clone(&manifest);
        tokio::spawn(async move {
            let svc = service_fn(move |req| {
                let manifest = Arc::clone(&manifest);
                async move { Ok::<_, Infallible>(respond_to_request(req, &manifest).await) }
            });

            if let Err(e) = auto::Builder::new(TokioExecutor::new())
                .serve_connection(TokioIo::new(tcp), svc)
                .await
            {
                log::error!("Error serving connection: {}", e);
            }
        });
    }
}

async fn accept(listener: &TcpListener) -> Result<TcpStream, io::Error> {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                stream.set_nodelay(true)?;
                return Ok(stream);
            }
            Err(e) if is_dropped_connection(&e) => {
                log::debug!("Aborted connection dropped: {}", e)
            }
            Err(e) => return Err(e),
        }
    }
}

/// Errors that only affect the connection being accepted, not the listener.
fn is_dropped_connection(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
    )
}
