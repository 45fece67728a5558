//! Output formatting module

use sevkiyat_types::{AggregationResult, OutputFormat, Result};

pub fn output_result(output_format: OutputFormat, result: &AggregationResult) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(result)?;
        println!("{}", content);
    } else {
        // Table format
        println!("\nSevkiyat Performans Raporu");
        println!("==========================");
        println!("Toplam sevkiyat: {}", result.summary.total_deliveries);
        println!("Toplam palet:    {:.1}", result.summary.total_pallets);
        println!("Toplam koli:     {:.1}", result.summary.total_boxes);

        if !result.employees.is_empty() {
            println!();
            println!(
                "{:<28} {:<18} {:>6} {:>9} {:>9} {:>10} {:>10} {:>5}",
                "Personel", "Görev", "Sefer", "Palet", "Koli", "Ort.Palet", "Ort.Koli", "Gün"
            );
            for emp in &result.employees {
                println!(
                    "{:<28} {:<18} {:>6} {:>9.1} {:>9.1} {:>10.2} {:>10.2} {:>5}",
                    emp.employee_name,
                    emp.position.label(),
                    emp.total_trips,
                    emp.total_pallets,
                    emp.total_boxes,
                    emp.average_pallets(),
                    emp.average_boxes(),
                    emp.days_worked()
                );
            }
        }

        if !result.vehicle_types.is_empty() {
            println!();
            println!(
                "{:<28} {:<12} {:>10} {:>15}",
                "Personel", "Araç Tipi", "Sefer Günü", "Çift Sefer Günü"
            );
            for v in &result.vehicle_types {
                println!(
                    "{:<28} {:<12} {:>10} {:>15}",
                    v.employee_name,
                    v.vehicle_type.label(),
                    v.total_trip_days,
                    v.total_double_trip_days
                );
            }
        }
    }

    Ok(())
}
