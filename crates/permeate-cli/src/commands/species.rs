use crate::error::Result;
use permeate::core::models::ion::IonSpecies;
use std::fmt::Write;

pub async fn run() -> Result<()> {
    print!("{}", format_table());
    Ok(())
}

fn format_table() -> String {
    let mut out = format!(
        "{:<8} {:<10} {:<6} {:>13} {:>6} {:>8} {:>9}\n",
        "Symbol", "Name", "Label", "Diameter (nm)", "Mass", "Max ppm", "Hardness"
    );
    for species in IonSpecies::ALL {
        let props = species.properties();
        let _ = writeln!(
            out,
            "{:<8} {:<10} {:<6} {:>13.1} {:>6.1} {:>8.0} {:>9}",
            species.symbol(),
            species.name(),
            species.label(),
            props.effective_diameter,
            props.mass,
            props.max_concentration,
            if species.contributes_to_hardness() { "yes" } else { "no" }
        );
    }
    out
}
