use std::io::Write;

use crate::{config::RunConfig, reduce::GlobalSum, units::mev_to_wavenumber};

/// Write the intensity table, one block per laser energy.
///
/// Each line holds the shift in meV, the shift in cm^-1 and the intensity.
///
/// # Errors
///
/// Returns any error from the writer
pub fn write_report<W: Write>(
    writer: &mut W,
    config: &RunConfig,
    global: &GlobalSum,
) -> std::io::Result<()> {
    let intensities = global.intensities();
    writeln!(writer, "calculation finalized")?;
    for (laser, &energy) in config.laser_energies.iter().enumerate() {
        writeln!(writer, "Laser energy: {energy}")?;
        for (shift, &value) in config.energy_shifts.iter().enumerate() {
            writeln!(
                writer,
                "{value:>14.6} {:>14.6} {:>24.16e}",
                mev_to_wavenumber(value),
                intensities[[shift, laser]]
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;
    use num_complex::Complex;

    use super::write_report;
    use crate::{
        config::RunConfig,
        reduce::{GlobalSum, PartialSum},
    };

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn test_report_layout() {
        let config = RunConfig::from_yaml(
            "
temperature: 300.0
n_steps: 10
limit: 1.0e-3
decay_rate: 1.0
smearing: 1.0
mid_level: 1.0
laser_energies: [2.0, 3.0]
energy_shifts: [1.0, 2.0, 3.0]
mode_table: modes.dat
",
        )
        .unwrap();
        let sums = Array2::from_shape_fn([3, 2], |(s, l)| {
            Complex::new(f64::from(10 * l as u32 + s as u32), 1.0)
        });
        // 2 step^3 = 1
        let global = GlobalSum::reduce([PartialSum::from_array(sums)], 0.5f64.cbrt());

        let mut out = Vec::new();
        write_report(&mut out, &config, &global).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 1 + 2 * 4);
        assert_eq!(lines[0], "calculation finalized");
        assert_eq!(lines[1], "Laser energy: 2");
        assert_eq!(lines[5], "Laser energy: 3");

        let fields = lines[7].split_whitespace().collect::<Vec<_>>();
        assert_eq!(fields.len(), 3);
        assert!((fields[0].parse::<f64>().unwrap() - 2.0).abs() < 1e-9);
        assert!((fields[1].parse::<f64>().unwrap() - 2.0 * 8.065_543_835_4).abs() < 1e-5);
        assert!((fields[2].parse::<f64>().unwrap() - 11.0).abs() < 1e-9);
    }
}
