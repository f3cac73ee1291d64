use crate::manifest::{Manifest, RouteAlias};
use crate::serve::body::BytesBody;
use headers::{ETag, HeaderMapExt, IfNoneMatch};
use hyper::body::Incoming;
use hyper::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use hyper::{Request, Response, StatusCode};

pub async fn respond_to_request(req: Request<Incoming>, manifest: &Manifest) -> Response<BytesBody> {
    respond(&req, manifest)
}

fn respond<B>(req: &Request<B>, manifest: &Manifest) -> Response<BytesBody> {
    let route = match manifest.lookup(req.method(), req.uri().path()) {
        Some(route) => route,
        None => {
            log::info!("{} {} -> [not found]", req.method(), req.uri());
            let mut resp = Response::new(BytesBody::empty());
            *resp.status_mut() = StatusCode::NOT_FOUND;
            return resp;
        }
    };

    let etag = route.etag.parse::<ETag>().ok();
    let not_modified = match (&etag, req.headers().typed_get::<IfNoneMatch>()) {
        (Some(etag), Some(if_none_match)) => !if_none_match.precondition_passes(etag),
        _ => false,
    };

    let mut resp = if not_modified {
        log::info!("{} {} -> [not modified]", req.method(), req.uri());
        let mut resp = Response::new(BytesBody::empty());
        *resp.status_mut() = StatusCode::NOT_MODIFIED;
        resp
    } else {
        let body = route.target.bytes().clone();
        log::info!(
            "{} {} -> [found {} bytes]",
            req.method(),
            req.uri(),
            body.len()
        );
        Response::new(BytesBody::new(body))
    };
    insert_headers(&mut resp, route, etag);
    resp
}

fn insert_headers(resp: &mut Response<BytesBody>, route: &RouteAlias, etag: Option<ETag>) {
    let headers = resp.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(route.target.mime_type()),
    );
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static(route.cache_policy.header_value()),
    );
    if let Some(etag) = etag {
        headers.typed_insert(etag);
    }
}
