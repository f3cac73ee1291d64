use crate::manifest::{Manifest, Target};
use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Render the manifest as Rust source: one embedded `const` per distinct file
/// and a `dist_response` function matching on the request path.
///
/// `include_root` is prepended to every relative embedded path, so the output
/// can be placed anywhere relative to the assets.
pub fn render(manifest: &Manifest, asset_dir: &Path, include_root: Option<&Path>) -> String {
    let mut out = String::new();
    let mut names = ConstNames::default();

    writeln!(
        out,
        "// @generated by dist-manifest from {:?}. Do not edit.",
        asset_dir.display().to_string()
    )
    .ok();
    out.push_str(concat!(
        "\n",
        "pub struct DistResponse {\n",
        "    pub content_type: &'static str,\n",
        "    pub cache_control: &'static str,\n",
        "    pub etag: &'static str,\n",
        "    pub body: &'static [u8],\n",
        "}\n",
        "\n",
    ));

    for route in manifest.routes() {
        let Some(name) = names.claim(&route.target) else {
            continue;
        };
        let source = match &route.target {
            Target::Asset(asset) => asset_dir.join(&asset.file_name),
            Target::Document(doc) => doc.source.clone(),
        };
        let source = embed_path(&source, include_root).display().to_string();
        if route.target.is_text() {
            writeln!(out, "const {}: &str = include_str!({:?});", name, source).ok();
        } else {
            writeln!(out, "const {}: &[u8] = include_bytes!({:?});", name, source).ok();
        }
    }

    out.push_str(concat!(
        "\n",
        "pub fn dist_response(method: &str, path: &str) -> Option<DistResponse> {\n",
        "    if method != \"GET\" {\n",
        "        return None;\n",
        "    }\n",
        "    let (content_type, cache_control, etag, body): (&'static str, &'static str, &'static str, &'static [u8]) = match path {\n",
    ));
    for route in manifest.routes() {
        let name = names.get(&route.target);
        let body = if route.target.is_text() {
            format!("{}.as_bytes()", name)
        } else {
            name.to_string()
        };
        writeln!(
            out,
            "        {:?} => ({:?}, {:?}, {:?}, {}),",
            route.path,
            route.target.mime_type(),
            route.cache_policy.header_value(),
            route.etag,
            body
        )
        .ok();
    }
    out.push_str(concat!(
        "        _ => return None,\n",
        "    };\n",
        "    Some(DistResponse { content_type, cache_control, etag, body })\n",
        "}\n",
    ));

    out
}

/// `include_root` is meant for relative sources; an absolute source is kept as is.
fn embed_path(source: &Path, include_root: Option<&Path>) -> PathBuf {
    match include_root {
        Some(root) if source.is_relative() => root.join(source),
        _ => source.to_path_buf(),
    }
}

/// Const identifiers, one per distinct target.
#[derive(Default)]
struct ConstNames {
    by_target: HashMap<*const (), String>,
    taken: HashSet<String>,
}

impl ConstNames {
    fn key(target: &Target) -> *const () {
        match target {
            Target::Asset(asset) => Arc::as_ptr(asset) as *const (),
            Target::Document(doc) => Arc::as_ptr(doc) as *const (),
        }
    }

    /// Returns a fresh name, or `None` if this target already has one.
    fn claim(&mut self, target: &Target) -> Option<String> {
        let key = Self::key(target);
        if self.by_target.contains_key(&key) {
            return None;
        }
        let file_name = match target {
            Target::Asset(asset) => asset.file_name.clone(),
            Target::Document(doc) => doc
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        let base = const_ident(&file_name);
        let mut name = base.clone();
        let mut n = 2;
        while !self.taken.insert(name.clone()) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        self.by_target.insert(key, name.clone());
        Some(name)
    }

    /// `render` claims every route's target before emitting the match arms,
    /// so each target looked up here already has a name.
    fn get(&self, target: &Target) -> &str {
        &self.by_target[&Self::key(target)]
    }
}

fn const_ident(file_name: &str) -> String {
    let ident = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect::<String>();
    match ident.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => ident,
        _ => format!("F_{}", ident),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestConfig;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn site(assets: &[(&str, &str)]) -> (TempDir, ManifestConfig) {
        let root = tempdir().unwrap();
        let dir = root.path().join("assets");
        fs::create_dir(&dir).unwrap();
        for (name, contents) in assets {
            fs::write(dir.join(name), contents).unwrap();
        }
        fs::write(root.path().join("index.html"), "<html></html>").unwrap();
        fs::write(root.path().join("add.html"), "<html>add</html>").unwrap();
        let config = ManifestConfig {
            asset_dir: dir,
            asset_prefix: "/assets".to_string(),
            index: root.path().join("index.html"),
            index_aliases: Vec::new(),
            documents: Vec::new(),
            ignored: vec!["map".to_string()],
        };
        (root, config)
    }

    #[test]
    fn const_idents() {
        assert_eq!(const_ident("index-4f2a.js"), "INDEX_4F2A_JS");
        assert_eq!(const_ident("favicon.ico"), "FAVICON_ICO");
        assert_eq!(const_ident("404.png"), "F_404_PNG");
        assert_eq!(const_ident("_x.css"), "F__X_CSS");
    }

    #[test]
    fn claimed_names_are_returned_for_every_alias() {
        let (root, mut config) = site(&[("app.js", "1")]);
        config.documents = vec![("/add".into(), root.path().join("add.html"))];
        config.index_aliases = vec!["/login".into()];
        let manifest = Manifest::build(&config).unwrap();

        let mut names = ConstNames::default();
        let claimed = manifest
            .routes()
            .iter()
            .filter_map(|r| names.claim(&r.target))
            .collect::<Vec<_>>();
        assert_eq!(claimed, ["INDEX_HTML", "ADD_HTML", "APP_JS"]);

        let got = manifest
            .routes()
            .iter()
            .map(|r| names.get(&r.target))
            .collect::<Vec<_>>();
        assert_eq!(got, ["INDEX_HTML", "INDEX_HTML", "ADD_HTML", "APP_JS"]);
    }

    #[test]
    fn include_root_prefixes_relative_sources() {
        let root = Path::new("../../../web");
        assert_eq!(
            embed_path(Path::new("dist/assets/app.js"), Some(root)),
            PathBuf::from("../../../web/dist/assets/app.js")
        );
        assert_eq!(
            embed_path(Path::new("dist/index.html"), None),
            PathBuf::from("dist/index.html")
        );
        let absolute = std::env::temp_dir().join("app.js");
        assert_eq!(embed_path(&absolute, Some(root)), absolute);
    }

    #[test]
    fn embeds_text_and_binary() {
        let (_root, config) = site(&[("app.js", "1"), ("logo.png", "PNG")]);
        let manifest = Manifest::build(&config).unwrap();
        let out = render(&manifest, &config.asset_dir, None);

        let js = config.asset_dir.join("app.js").display().to_string();
        let png = config.asset_dir.join("logo.png").display().to_string();
        assert!(out.contains(&format!("const APP_JS: &str = include_str!({:?});", js)));
        assert!(out.contains(&format!("const LOGO_PNG: &[u8] = include_bytes!({:?});", png)));
        assert!(out.contains("const INDEX_HTML: &str = include_str!("));

        let app_etag = &manifest.routes()[1].etag;
        assert!(out.contains(&format!(
            "\"/assets/app.js\" => (\"text/javascript\", \"max-age=31536000\", {:?}, APP_JS.as_bytes()),",
            app_etag
        )));
        assert!(out.contains("\"/assets/logo.png\" => (\"image/png\", \"max-age=31536000\", "));
        assert!(out.contains(", LOGO_PNG),"));
        assert!(out.contains("\"/\" => (\"text/html\", \"no-cache\", "));
        assert!(out.contains("if method != \"GET\" {"));
        assert!(out.contains("_ => return None,"));
    }

    #[test]
    fn shared_documents_are_embedded_once() {
        let (root, mut config) = site(&[]);
        config.index_aliases = vec!["/login".into(), "/setup".into()];
        config.documents = vec![("/add".into(), root.path().join("add.html"))];
        let manifest = Manifest::build(&config).unwrap();
        let out = render(&manifest, &config.asset_dir, None);

        assert_eq!(out.matches("const INDEX_HTML").count(), 1);
        assert_eq!(out.matches("const ADD_HTML").count(), 1);
        assert_eq!(out.matches("INDEX_HTML.as_bytes()").count(), 3);
        assert!(out.contains("\"/add\" => (\"text/html\", \"no-cache\", "));
    }

    #[test]
    fn colliding_idents_get_suffixes() {
        let (_root, config) = site(&[("a-b.js", "1"), ("a_b.js", "2")]);
        let manifest = Manifest::build(&config).unwrap();
        let out = render(&manifest, &config.asset_dir, None);

        assert!(out.contains("const A_B_JS: &str"));
        assert!(out.contains("const A_B_JS_2: &str"));
        assert!(out.contains("\"/assets/a_b.js\" => (\"text/javascript\", \"max-age=31536000\", "));
        assert!(out.contains(", A_B_JS_2.as_bytes()),"));
    }

    #[test]
    fn output_is_stable() {
        let (_root, config) = site(&[("z.js", "z"), ("a.css", "a"), ("m.ico", "m")]);
        let first = render(&Manifest::build(&config).unwrap(), &config.asset_dir, None);
        let second = render(&Manifest::build(&config).unwrap(), &config.asset_dir, None);
        assert_eq!(first, second);

        let a = first.find("\"/assets/a.css\"").unwrap();
        let m = first.find("\"/assets/m.ico\"").unwrap();
        let z = first.find("\"/assets/z.js\"").unwrap();
        assert!(a < m && m < z);
    }
}
