//! Excel export functionality

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

use sevkiyat_types::{AggregationResult, Error, Result};

/// Export an aggregation result to an Excel workbook
pub fn export_to_excel(result: &AggregationResult, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, result)?;

    let personnel_sheet = workbook.add_worksheet();
    write_personnel_sheet(personnel_sheet, result)?;

    let vehicle_sheet = workbook.add_worksheet();
    write_vehicle_sheet(vehicle_sheet, result)?;

    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, result: &AggregationResult) -> Result<()> {
    sheet
        .set_name("Özet")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, "Sevkiyat Performans Raporu", &header_format)
        .map_err(|e| Error::Excel(e.to_string()))?;

    let rows: [(&str, f64); 5] = [
        ("Toplam Sevkiyat:", result.summary.total_deliveries as f64),
        ("Toplam Palet:", result.summary.total_pallets),
        ("Toplam Koli:", result.summary.total_boxes),
        ("Personel Sayısı:", result.employees.len() as f64),
        (
            "Araç Tipi Kaydı:",
            result.vehicle_types.len() as f64,
        ),
    ];

    for (i, (label, value)) in rows.iter().enumerate() {
        let row = (i + 2) as u32;
        sheet
            .write_string(row, 0, *label)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 1, *value)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    sheet
        .set_column_width(0, 20)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}

fn write_personnel_sheet(sheet: &mut Worksheet, result: &AggregationResult) -> Result<()> {
    sheet
        .set_name("Personel")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();

    let headers = [
        "Personel",
        "Sicil",
        "Görev",
        "Sefer",
        "Palet",
        "Koli",
        "Ort. Palet",
        "Ort. Koli",
        "Gün",
    ];

    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    for (row_idx, employee) in result.employees.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet
            .write_string(row, 0, &employee.employee_name)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 1, employee.employee_code.as_deref().unwrap_or(""))
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 2, employee.position.label())
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 3, employee.total_trips as f64)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 4, employee.total_pallets)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 5, employee.total_boxes)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 6, employee.average_pallets())
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 7, employee.average_boxes())
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 8, employee.days_worked() as f64)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    sheet
        .set_column_width(0, 28)
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .set_column_width(2, 18)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}

fn write_vehicle_sheet(sheet: &mut Worksheet, result: &AggregationResult) -> Result<()> {
    sheet
        .set_name("Araç Tipleri")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();

    let headers = ["Personel", "Araç Tipi", "Sefer Günü", "Çift Sefer Günü"];
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    for (row_idx, vt) in result.vehicle_types.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet
            .write_string(row, 0, &vt.employee_name)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 1, vt.vehicle_type.label())
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 2, vt.total_trip_days as f64)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 3, vt.total_double_trip_days as f64)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    sheet
        .set_column_width(0, 28)
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .set_column_width(1, 14)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}
