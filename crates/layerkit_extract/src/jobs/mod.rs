mod filter_layers;
mod resize_canvas;
mod strip_guides;

use crate::{context::Context, error::ExtractError};

pub use self::filter_layers::{FilterLayers, Filtered, Layer};
pub use self::resize_canvas::{Canvas, ResizeCanvas, DEFAULT_SIZE};
pub use self::strip_guides::StripGuides;

/// A step of the extraction which edits the document in place
pub trait Job {
    /// What the job reports after running
    type Output;

    /// Runs the job over the document of the context.
    ///
    /// # Errors
    ///
    /// If the document can't be processed by the job
    fn run(&self, context: &Context<'_>) -> Result<Self::Output, ExtractError>;
}

#[cfg(test)]
pub(crate) fn test_job<J: Job>(job: &J, source: &str) -> anyhow::Result<(String, J::Output)>
where
    J::Output: 'static,
{
    use layerkit_ast::{
        parse::{parse_with_options, ParsingOptions},
        serialize::{Node as _, Options},
    };

    let result = parse_with_options(source, ParsingOptions::default(), |dom, _| {
        let context = Context::new(dom)?;
        let output = job.run(&context)?;
        let xml = dom.serialize_with_options(Options {
            xml_declaration: false,
            ..Options::default()
        })?;
        Ok::<_, ExtractError>((xml, output))
    })??;
    Ok(result)
}
