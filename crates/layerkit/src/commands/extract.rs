use std::{
    io::Read,
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use layerkit_ast::serialize::{Indent, Options};
use layerkit_extract::{Report, DEFAULT_SIZE};

use crate::{args::RunCommand, config::Config};

#[derive(clap::Args, Debug)]
/// Removes every layer but one from an Inkscape document and squares its canvas.
pub struct Extract {
    /// The input file.
    /// Defaults to standard input.
    #[clap(long, short, value_name = "SVG")]
    pub input: Option<PathBuf>,
    /// The output file, created along with its directory when missing.
    /// Defaults to standard output.
    #[clap(long, short, value_name = "SVG")]
    pub output: Option<PathBuf>,
    /// The label of the layer to preserve
    #[clap(long, short, value_name = "LAYER")]
    pub layer: String,
    /// The width and height of the output canvas.
    /// Defaults to the configured size, or 96.
    #[clap(long, short)]
    pub size: Option<NonZeroU32>,
    /// Controls whether the output is indented with tabs or spaces.
    ///
    /// Accepts `none`, `tabs`, or a number
    #[clap(long, short)]
    pub pretty: Option<Indent>,
    /// Omits the xml declaration from the output
    #[clap(long)]
    pub no_declaration: bool,
}

impl RunCommand for Extract {
    fn run(self, config: Config) -> anyhow::Result<()> {
        let extract = layerkit_extract::Extract {
            layer: self.layer.clone(),
            size: self.size.or(config.size).unwrap_or(DEFAULT_SIZE),
        };
        let options = Options {
            indent: self.pretty.or(config.pretty).unwrap_or_default(),
            xml_declaration: !self.no_declaration && config.declaration.unwrap_or(true),
            ..Options::default()
        };

        let source = self.read()?;
        let report = match &self.output {
            Some(path) => {
                let (output, report) = extract.transform(&source, options)?;
                write_file(path, &output)?;
                report
            }
            None => extract.extract_into(&source, std::io::stdout().lock(), options)?,
        };
        self.summarise(&report);
        Ok(())
    }
}

impl Extract {
    fn read(&self) -> anyhow::Result<Vec<u8>> {
        if let Some(path) = &self.input {
            log::debug!("reading {}", path.display());
            return std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()));
        }

        log::debug!("reading standard input");
        let mut source = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut source)
            .context("Failed to read standard input")?;
        Ok(source)
    }

    fn summarise(&self, report: &Report) {
        log::debug!(
            "removed {} guides and {} layers, kept {} unlabeled layers",
            report.guides_removed,
            report.layers_removed.len(),
            report.unlabeled_layers
        );
        if !report.found {
            log::warn!("No layer is labeled `{}`", self.layer);
        }
    }
}

fn write_file(path: &Path, output: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, output).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Written: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser as _;

    use super::Extract;
    use crate::{
        args::{Args, Command, RunCommand as _},
        config::Config,
    };

    const SOURCE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd" width="512" height="512">
  <sodipodi:namedview id="namedview1">
    <sodipodi:guide id="guide1" position="0,0"/>
  </sodipodi:namedview>
  <g inkscape:groupmode="layer" inkscape:label="background" id="layer1"/>
  <g inkscape:groupmode="layer" inkscape:label="icon" id="layer2"/>
</svg>
"#;

    fn parse(args: &[&str]) -> anyhow::Result<Args> {
        Ok(Args::try_parse_from(
            std::iter::once("layerkit").chain(args.iter().copied()),
        )?)
    }

    fn extract_args(args: Args) -> Extract {
        match args.command {
            Command::Extract(extract) => extract,
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("layerkit-{name}-{}", std::process::id()))
    }

    #[test]
    fn parse_args() -> anyhow::Result<()> {
        let args = parse(&[
            "extract", "-i", "in.svg", "-o", "out.svg", "-l", "icon", "-s", "48", "-p", "tabs",
            "-c", "config.json",
        ])?;
        assert_eq!(args.config, Some(PathBuf::from("config.json")));

        let extract = extract_args(args);
        assert_eq!(extract.input, Some(PathBuf::from("in.svg")));
        assert_eq!(extract.output, Some(PathBuf::from("out.svg")));
        assert_eq!(extract.layer, "icon");
        assert_eq!(extract.size.map(std::num::NonZeroU32::get), Some(48));
        assert_eq!(extract.pretty, Some(layerkit_ast::serialize::Indent::Tabs));
        assert!(!extract.no_declaration);

        let extract = extract_args(parse(&["extract", "--layer", "icon", "--no-declaration"])?);
        assert!(extract.input.is_none());
        assert!(extract.size.is_none());
        assert!(extract.no_declaration);
        Ok(())
    }

    #[test]
    fn parse_invalid_args() {
        assert!(parse(&["extract"]).is_err(), "layer should be required");
        assert!(parse(&["extract", "-l", "icon", "-s", "0"]).is_err());
        assert!(parse(&["extract", "-l", "icon", "-s", "48px"]).is_err());
        assert!(parse(&["extract", "-l", "icon", "-p", "wide"]).is_err());
    }

    #[test]
    fn extract_to_file() -> anyhow::Result<()> {
        let dir = scratch_dir("extract");
        let input = dir.join("input.svg");
        let output = dir.join("nested").join("icon.svg");
        std::fs::create_dir_all(&dir)?;
        std::fs::write(&input, SOURCE)?;

        let (input_arg, output_arg) = (input.to_string_lossy(), output.to_string_lossy());
        let extract = extract_args(parse(&[
            "extract", "-i", &*input_arg, "-o", &*output_arg, "-l", "icon",
        ])?);
        extract.run(Config {
            size: std::num::NonZeroU32::new(32),
            pretty: None,
            declaration: Some(false),
        })?;

        let result = std::fs::read_to_string(&output)?;
        std::fs::remove_dir_all(&dir)?;
        pretty_assertions::assert_eq!(
            result,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd" width="32" height="32" viewBox="0 0 32 32">
  <sodipodi:namedview id="namedview1">
  </sodipodi:namedview>
  <g inkscape:groupmode="layer" inkscape:label="icon" id="layer2"/>
</svg>
"#
        );
        Ok(())
    }

    #[test]
    fn extract_invalid_document_writes_nothing() -> anyhow::Result<()> {
        let dir = scratch_dir("invalid");
        let input = dir.join("input.svg");
        let output = dir.join("icon.svg");
        std::fs::create_dir_all(&dir)?;
        std::fs::write(&input, SOURCE.replace(r#"width="512""#, r#"width="512px""#))?;

        let (input_arg, output_arg) = (input.to_string_lossy(), output.to_string_lossy());
        let extract = extract_args(parse(&[
            "extract", "-i", &*input_arg, "-o", &*output_arg, "-l", "icon",
        ])?);
        let result = extract.run(Config::default());
        let written = output.exists();
        std::fs::remove_dir_all(&dir)?;

        assert!(result.is_err());
        assert!(!written);
        Ok(())
    }
}
