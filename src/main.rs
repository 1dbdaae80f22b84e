mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::output::OutputConfig;
use cli::{Cli, Resource};
use epub_inspect::{
    PublicationInfo, extract_core_metadata, extract_toc_links, find_cover_image_zip_path,
    guess_content_type, open_entry_stream, try_open_publication,
};
use std::io::{self, Write};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = OutputConfig::from_global(cli.json, cli.verbose, cli.quiet, cli.no_color);
    output.init_tracing();

    match cli.command {
        Resource::Book { command } => handle_book(command, &output)?,
        Resource::Metadata { command } => handle_metadata(command, &output)?,
        Resource::Toc { command } => handle_toc(command, &output)?,
        Resource::Spine { command } => handle_spine(command, &output)?,
        Resource::Asset { command } => handle_asset(command, &output)?,
    }

    Ok(())
}

fn open(file: &Path) -> Result<PublicationInfo> {
    try_open_publication(file).map_err(|e| {
        let what = if e.is_structural() {
            "no readable publication in"
        } else {
            "failed to read"
        };
        anyhow::Error::new(e).context(format!("{what} {}", file.display()))
    })
}

fn handle_book(command: cli::book::BookCommand, output: &OutputConfig) -> Result<()> {
    use cli::book::BookCommand;

    match command {
        BookCommand::Info { file } => {
            let info = open(&file)?;
            let cover = find_cover_image_zip_path(&info);

            if output.json {
                let mut json = serde_json::json!({
                    "title": info.title,
                    "language": info.language,
                    "package_document": info.package_document_path,
                    "spine_items": info.spine_hrefs.len(),
                    "manifest_items": info.manifest_id_to_href.len(),
                    "cover": cover,
                });
                if output.verbose {
                    json["legacy_toc_id"] = serde_json::json!(info.legacy_toc_id);
                    json["archive_path"] = serde_json::json!(info.archive_path);
                }
                output.print_json(&json)?;
            } else {
                println!("Title:    {}", info.title.as_deref().unwrap_or("(untitled)"));
                if let Some(ref language) = info.language {
                    println!("Language: {language}");
                }
                println!("Package:  {}", info.package_document_path);
                println!("Spine:    {} item(s)", info.spine_hrefs.len());
                println!("Manifest: {} item(s)", info.manifest_id_to_href.len());
                println!("Cover:    {}", cover.as_deref().unwrap_or("(none)"));
                if let Some(ref toc_id) = info.legacy_toc_id {
                    output.detail(&format!("NCX id:   {toc_id}"));
                }
                output.detail(&format!("Archive:  {}", info.archive_path.display()));
            }
        }
    }

    Ok(())
}

fn handle_metadata(command: cli::metadata::MetadataCommand, output: &OutputConfig) -> Result<()> {
    use cli::metadata::MetadataCommand;

    match command {
        MetadataCommand::Show { file } => {
            let info = open(&file)?;
            let metadata = extract_core_metadata(&info).unwrap_or_default();

            if output.json {
                output.print_json(&metadata)?;
            } else {
                let m = &metadata;
                if let Some(ref title) = m.title {
                    println!("Title:       {title}");
                }
                if !m.creators.is_empty() {
                    println!("Creator:     {}", m.creators.join("; "));
                }
                if let Some(ref identifier) = m.identifier {
                    println!("Identifier:  {identifier}");
                }
                if let Some(ref isbn) = m.isbn {
                    println!("ISBN:        {isbn}");
                }
                if let Some(ref language) = m.language {
                    println!("Language:    {language}");
                }
                if let Some(ref publisher) = m.publisher {
                    println!("Publisher:   {publisher}");
                }
                if let Some(ref date) = m.date {
                    println!("Date:        {date}");
                }
                if let Some(ref desc) = m.description {
                    println!("Description: {desc}");
                }
                if !m.subjects.is_empty() {
                    println!("Subjects:    {}", m.subjects.join("; "));
                }
            }
        }
    }

    Ok(())
}

fn handle_toc(command: cli::toc::TocCommand, output: &OutputConfig) -> Result<()> {
    use cli::toc::TocCommand;

    match command {
        TocCommand::Show { file } => {
            let info = open(&file)?;
            let links = extract_toc_links(&info);

            if output.json {
                output.print_json(&links)?;
            } else if links.is_empty() {
                output.status("No table of contents");
            } else {
                let rows: Vec<Vec<String>> = links
                    .iter()
                    .enumerate()
                    .map(|(i, link)| {
                        vec![
                            (i + 1).to_string(),
                            link.label.clone().unwrap_or_default(),
                            link.target(),
                        ]
                    })
                    .collect();
                output.print_table(&["#", "LABEL", "TARGET"], &rows);
            }
        }
    }

    Ok(())
}

fn handle_spine(command: cli::spine::SpineCommand, output: &OutputConfig) -> Result<()> {
    use cli::spine::SpineCommand;

    match command {
        SpineCommand::List { file } => {
            let info = open(&file)?;

            if output.json {
                let items: Vec<_> = info
                    .spine_hrefs
                    .iter()
                    .enumerate()
                    .map(|(i, href)| {
                        serde_json::json!({
                            "index": i,
                            "href": href,
                            "media_type": info.media_type_of(href),
                        })
                    })
                    .collect();
                output.print_json(&items)?;
            } else {
                let rows: Vec<Vec<String>> = info
                    .spine_hrefs
                    .iter()
                    .enumerate()
                    .map(|(i, href)| {
                        vec![
                            i.to_string(),
                            href.clone(),
                            info.media_type_of(href).unwrap_or("-").to_string(),
                        ]
                    })
                    .collect();
                output.print_table(&["#", "HREF", "MEDIA TYPE"], &rows);
            }
        }
    }

    Ok(())
}

fn handle_asset(command: cli::asset::AssetCommand, output: &OutputConfig) -> Result<()> {
    use cli::asset::AssetCommand;

    match command {
        AssetCommand::Cover {
            file,
            output: out_file,
        } => {
            let info = open(&file)?;
            let Some(cover) = find_cover_image_zip_path(&info) else {
                if output.json {
                    output.print_json(&serde_json::json!({ "cover": null }))?;
                } else {
                    output.status("no cover");
                }
                return Ok(());
            };

            if let Some(out_path) = out_file {
                let written = write_entry(&info, &cover, &out_path)?;
                output.status(&format!("Wrote {cover} to {}", out_path.display()));
                output.detail(&format!("  {written} bytes, {}", guess_content_type(&cover)));
            } else if output.json {
                output.print_json(&serde_json::json!({
                    "cover": cover,
                    "content_type": guess_content_type(&cover),
                }))?;
            } else {
                println!("{cover}");
            }
        }
        AssetCommand::Extract {
            file,
            entry,
            output: out_file,
        } => {
            let info = open(&file)?;
            match out_file {
                Some(out_path) => {
                    write_entry(&info, &entry, &out_path)?;
                    output.status(&format!("Extracted {entry} to {}", out_path.display()));
                }
                None => {
                    let mut stream = open_entry_stream(&info, &entry)
                        .with_context(|| format!("opening {entry}"))?;
                    let stdout = io::stdout();
                    let mut lock = stdout.lock();
                    stream.copy_to(&mut lock)?;
                    lock.flush()?;
                }
            }
        }
        AssetCommand::Type { name } => {
            let content_type = guess_content_type(&name);
            if output.json {
                output.print_json(&serde_json::json!({
                    "name": name,
                    "content_type": content_type,
                }))?;
            } else {
                println!("{content_type}");
            }
        }
    }

    Ok(())
}

/// Stream an archive entry into a new file, returning the bytes written.
fn write_entry(info: &PublicationInfo, entry: &str, out_path: &Path) -> Result<u64> {
    let mut stream =
        open_entry_stream(info, entry).with_context(|| format!("opening {entry}"))?;
    let mut file = std::fs::File::create(out_path)
        .with_context(|| format!("creating {}", out_path.display()))?;
    let written = stream.copy_to(&mut file)?;
    file.flush()?;
    Ok(written)
}
