use anyhow::Result;

use rma_policy::evaluate;

/// Run the `rma check` command: print the eligibility verdict.
pub fn run(purchase_date: &str, category: &str, as_of: Option<&str>) -> Result<()> {
    let verdict = evaluate(purchase_date, category, as_of)?;
    println!("{verdict}");
    Ok(())
}
