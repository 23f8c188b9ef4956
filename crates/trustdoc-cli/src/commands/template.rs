//! Template command implementation.

use crate::cli::TemplateArgs;
use crate::error::Result;
use crate::output::Formatter;
use trustdoc_reconciler::TemplateShape;

/// Execute the template command.
pub async fn execute_template(
    args: TemplateArgs,
    template: &TemplateShape,
    formatter: &Formatter,
) -> Result<()> {
    println!("{}", formatter.template(template, args.classes)?);
    Ok(())
}
