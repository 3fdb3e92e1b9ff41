//! Conversion settings
//!
//! Plain data consumed by the builders. `oedx-config` produces these from layered
//! configuration files; library callers can also start from [`Settings::default`].

/// Identity stamped into `course.xml` and used as the root of every `url_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSettings {
    pub org: String,
    pub url_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlSettings {
    /// Indentation unit for pretty-printed structural files
    pub indent: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownSettings {
    /// Render soft line breaks as `<br />`
    pub hard_breaks: bool,
}

/// Where CDN-hosted images are moved to during the reverse conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSettings {
    pub cdn_domain: String,
    pub storage_base_url: String,
    pub key_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSettings {
    pub file_name: String,
    /// Top-level directory inside the tarball; empty puts files at the archive root
    pub root_dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub package: PackageSettings,
    pub xml: XmlSettings,
    pub markdown: MarkdownSettings,
    pub images: ImageSettings,
    pub archive: ArchiveSettings,
    /// Name of the index file looked up in source directories and written on reverse
    pub index_file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            package: PackageSettings {
                org: "IRONHACK".to_string(),
                url_prefix: "ironhack".to_string(),
            },
            xml: XmlSettings {
                indent: "    ".to_string(),
            },
            markdown: MarkdownSettings { hard_breaks: false },
            images: ImageSettings {
                cdn_domain: "ironhack.school".to_string(),
                storage_base_url: "https://ih-materials.s3-eu-west-1.amazonaws.com/".to_string(),
                key_prefix: "java/".to_string(),
            },
            archive: ArchiveSettings {
                file_name: "course.tar.gz".to_string(),
                root_dir: "course".to_string(),
            },
            index_file_name: "index.json".to_string(),
        }
    }
}
