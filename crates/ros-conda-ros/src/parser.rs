//! Package.xml parser

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use ros_conda_core::{Error, Result};
use thiserror::Error;
use tracing::debug;

use crate::package_xml::{
    DependencySpec, ExportBuildType, PackageDependencies, PackageManifest, Person, Url,
};

/// File name of the manifest inside a package directory
pub const PACKAGE_XML: &str = "package.xml";

#[derive(Error, Debug)]
enum ParseError {
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Invalid UTF-8 in XML: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid package format: {0}")]
    InvalidFormat(String),

    #[error("XML attribute error: {0}")]
    AttrError(#[from] quick_xml::events::attributes::AttrError),
}

/// Read and parse `package.xml` from a package directory
pub fn load_manifest(manifest_root: &Path) -> Result<PackageManifest> {
    let path = manifest_root.join(PACKAGE_XML);
    if !path.is_file() {
        return Err(Error::not_found(
            "package.xml",
            format!("no manifest at {}", path.display()),
        ));
    }
    parse_package_xml(&path)
}

/// Parse a package.xml file
pub fn parse_package_xml(path: &Path) -> Result<PackageManifest> {
    let content = std::fs::read_to_string(path)?;
    let manifest = parse_manifest_internal(&content)
        .map_err(|e| Error::parse(format!("Failed to parse {}: {}", path.display(), e)))?;

    debug!("Parsed {} (format {}) from {}", manifest.name, manifest.format, path.display());
    Ok(manifest)
}

/// Parse package.xml content into a manifest
pub fn parse_package_manifest(xml_content: &str) -> Result<PackageManifest> {
    parse_manifest_internal(xml_content).map_err(|e| Error::parse(e.to_string()))
}

fn parse_manifest_internal(xml_content: &str) -> std::result::Result<PackageManifest, ParseError> {
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut manifest = PackageManifest {
        format: 1,
        name: String::new(),
        version: String::new(),
        description: String::new(),
        maintainers: Vec::new(),
        authors: Vec::new(),
        licenses: Vec::new(),
        urls: Vec::new(),
        build_types: Vec::new(),
        dependencies: PackageDependencies::default(),
    };

    let mut buf = Vec::new();
    let mut current_element = String::new();
    let mut in_export = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name();
                let name = std::str::from_utf8(name_bytes.as_ref())?;
                current_element = name.to_string();

                match name {
                    "package" => manifest.format = parse_format(e)?,
                    "export" => in_export = true,
                    "build_type" if in_export => {
                        if let Some(build_type) = parse_build_type(&mut reader, e)? {
                            manifest.build_types.push(build_type);
                        }
                    }
                    "build_depend"
                    | "build_export_depend"
                    | "buildtool_depend"
                    | "buildtool_export_depend"
                    | "exec_depend"
                    | "run_depend"
                    | "test_depend"
                    | "doc_depend"
                    | "depend" => {
                        if let Some(dep) = parse_dependency(&mut reader, e)? {
                            add_dependency(&mut manifest.dependencies, name, dep);
                        }
                    }
                    "maintainer" | "author" => {
                        if let Some(person) = parse_person(&mut reader, e)? {
                            match name {
                                "maintainer" => manifest.maintainers.push(person),
                                "author" => manifest.authors.push(person),
                                _ => {}
                            }
                        }
                    }
                    "url" => {
                        if let Some(url) = parse_url(&mut reader, e)? {
                            manifest.urls.push(url);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let name_bytes = e.name();
                let name = std::str::from_utf8(name_bytes.as_ref())?;
                if name == "export" {
                    in_export = false;
                }
                current_element.clear();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape()?.trim().to_string();
                if !text.is_empty() {
                    match current_element.as_str() {
                        "name" => manifest.name = text,
                        "version" => manifest.version = text,
                        "description" => manifest.description = text,
                        "license" => manifest.licenses.push(text),
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    // Validate required fields
    if manifest.name.is_empty() {
        return Err(ParseError::MissingField("name".to_string()));
    }
    if manifest.version.is_empty() {
        return Err(ParseError::MissingField("version".to_string()));
    }
    if manifest.description.is_empty() {
        return Err(ParseError::MissingField("description".to_string()));
    }
    if manifest.maintainers.is_empty() {
        return Err(ParseError::MissingField("maintainer".to_string()));
    }
    if manifest.format == 1 && !manifest.dependencies.depend.is_empty() {
        return Err(ParseError::InvalidFormat("<depend> requires format 2 or later".to_string()));
    }
    if manifest.format > 1 && !manifest.dependencies.run_depend.is_empty() {
        return Err(ParseError::InvalidFormat("<run_depend> is only valid in format 1".to_string()));
    }

    // Expand generic and format 1 run dependencies
    manifest.dependencies.expand_generic_depends();
    manifest.dependencies.expand_run_depends();

    Ok(manifest)
}

fn parse_format(e: &BytesStart) -> std::result::Result<u32, ParseError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"format" {
            let value = std::str::from_utf8(&attr.value)?;
            return match value.trim().parse::<u32>() {
                Ok(format @ 1..=3) => Ok(format),
                _ => Err(ParseError::InvalidFormat(format!("unsupported format '{value}'"))),
            };
        }
    }
    Ok(1)
}

fn parse_dependency(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart,
) -> std::result::Result<Option<DependencySpec>, ParseError> {
    let mut dep = DependencySpec::new(String::new());

    // Parse attributes
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "version_eq" => dep.version_eq = Some(value.to_string()),
            "version_gte" => dep.version_gte = Some(value.to_string()),
            "version_lte" => dep.version_lte = Some(value.to_string()),
            "version_gt" => dep.version_gt = Some(value.to_string()),
            "version_lt" => dep.version_lt = Some(value.to_string()),
            "condition" => dep.condition = Some(value.to_string()),
            _ => {}
        }
    }

    dep.name = read_text(reader)?;

    if dep.name.is_empty() {
        Ok(None)
    } else {
        Ok(Some(dep))
    }
}

fn parse_build_type(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart,
) -> std::result::Result<Option<ExportBuildType>, ParseError> {
    let mut condition = None;
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"condition" {
            condition = Some(std::str::from_utf8(&attr.value)?.to_string());
        }
    }

    let name = read_text(reader)?;
    if name.is_empty() {
        Ok(None)
    } else {
        Ok(Some(ExportBuildType::new(name, condition)))
    }
}

fn parse_person(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart,
) -> std::result::Result<Option<Person>, ParseError> {
    let mut person = Person { name: String::new(), email: None };

    // Check for email attribute
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"email" {
            person.email = Some(std::str::from_utf8(&attr.value)?.to_string());
        }
    }

    person.name = read_text(reader)?;

    if person.name.is_empty() {
        Ok(None)
    } else {
        Ok(Some(person))
    }
}

fn parse_url(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart,
) -> std::result::Result<Option<Url>, ParseError> {
    let mut url = Url { url_type: None, url: String::new() };

    // Check for type attribute
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"type" {
            url.url_type = Some(std::str::from_utf8(&attr.value)?.to_string());
        }
    }

    url.url = read_text(reader)?;

    if url.url.is_empty() {
        Ok(None)
    } else {
        Ok(Some(url))
    }
}

/// Read the text content of the current element up to its end tag
fn read_text(reader: &mut Reader<&[u8]>) -> std::result::Result<String, ParseError> {
    let mut text = String::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text = e.unescape()?.trim().to_string(),
            Event::End(_) | Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

fn add_dependency(deps: &mut PackageDependencies, dep_type: &str, dep: DependencySpec) {
    match dep_type {
        "build_depend" => deps.build_depend.push(dep),
        "build_export_depend" => deps.build_export_depend.push(dep),
        "buildtool_depend" => deps.buildtool_depend.push(dep),
        "buildtool_export_depend" => deps.buildtool_export_depend.push(dep),
        "exec_depend" => deps.exec_depend.push(dep),
        "run_depend" => deps.run_depend.push(dep),
        "test_depend" => deps.test_depend.push(dep),
        "doc_depend" => deps.doc_depend.push(dep),
        "depend" => deps.depend.push(dep),
        _ => {}
    }
}
