//! Output formatting
//!
//! Human output goes to stdout with optional colors; `--format json` prints
//! the underlying values for scripting.

use colored::*;
use fhir_admin_core::{
    AdminError, DisplayOption, Location, LocationFormFields, Result, TeamDetails, TeamFormFields,
};
use serde::Serialize;

use crate::OutputFormat;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AdminError::serialization_error(format!("Failed to serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}

fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<16} {}", format!("{label}:").dimmed(), value);
}

fn optional(value: Option<&str>) -> ColoredString {
    match value {
        Some(v) if !v.is_empty() => v.normal(),
        _ => "-".dimmed(),
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print location form values
pub fn print_form_fields(fields: &LocationFormFields, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(fields);
    }

    let heading = if fields.is_edit() {
        "Edit location"
    } else {
        "New location"
    };
    println!("{}", heading.bold());
    field("id", optional(fields.id.as_deref()));
    field("name", optional(Some(fields.name.as_str())));
    field("status", fields.status.as_str());
    field("parentId", optional(fields.parent_id.as_deref()));
    field("alias", optional(fields.alias.as_deref()));
    field("description", optional(fields.description.as_deref()));
    field(
        "type",
        if fields.is_jurisdiction {
            "jurisdiction"
        } else {
            "structure"
        },
    );
    Ok(())
}

/// Print tree-select options as an indented tree
pub fn print_options(options: &[DisplayOption], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(options);
    }

    if options.is_empty() {
        println!("{}", "No locations found".yellow());
        return Ok(());
    }

    fn walk(option: &DisplayOption, depth: usize) {
        let indent = "  ".repeat(depth);
        let id = format!("({})", option.value).dimmed();
        if option.disabled == Some(true) {
            println!(
                "{indent}{} {id} {}",
                option.title.strikethrough().dimmed(),
                "[disabled]".red()
            );
        } else {
            println!("{indent}{} {id}", option.title);
        }
        for child in option.children.iter().flatten() {
            walk(child, depth + 1);
        }
    }

    for option in options {
        walk(option, 0);
    }
    Ok(())
}

/// Print a location payload or saved resource
pub fn print_location(location: &Location, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(location);
    }

    println!(
        "{} {}",
        "Location".bold(),
        optional(location.id.as_deref())
    );
    field("name", optional(location.name.as_deref()));
    field(
        "status",
        location.status.map(|s| s.as_str()).unwrap_or("-"),
    );
    field("identifier", optional(location.identifier_value()));
    field(
        "partOf",
        optional(location.part_of.as_ref().and_then(|r| r.reference.as_deref())),
    );
    field(
        "physicalType",
        optional(location.physical_type_kind().map(|t| t.display())),
    );
    field("alias", location.alias.join(", "));
    field("description", optional(location.description.as_deref()));
    Ok(())
}

#[derive(Serialize)]
struct TeamView<'a> {
    form: &'a TeamFormFields,
    members: Vec<MemberView<'a>>,
}

#[derive(Serialize)]
struct MemberView<'a> {
    id: &'a str,
    name: String,
}

/// Print a team with its members
pub fn print_team(details: &TeamDetails, form: &TeamFormFields, format: OutputFormat) -> Result<()> {
    let members: Vec<MemberView> = details
        .practitioners
        .iter()
        .map(|p| MemberView {
            id: p.id.as_deref().unwrap_or_default(),
            name: p.display_name(),
        })
        .collect();

    if format == OutputFormat::Json {
        return print_json(&TeamView { form, members });
    }

    println!("{} {}", "Team".bold(), optional(form.id.as_deref()));
    field("name", optional(Some(form.name.as_str())));
    field("active", form.active);
    field(
        "identifier",
        optional(form.identifier.first().and_then(|i| i.value.as_deref())),
    );
    println!("  {}", format!("members ({}):", members.len()).dimmed());
    for member in &members {
        println!("    - {} {}", member.name, format!("({})", member.id).dimmed());
    }
    Ok(())
}
