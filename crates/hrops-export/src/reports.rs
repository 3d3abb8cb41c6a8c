//! Preset report definitions.
//!
//! Each report kind carries the field list, title and download filename the
//! HR backend uses for its report endpoints, plus explicit field types for
//! money and date columns.

use crate::options::ExportOptions;
use crate::value::FieldKind;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Report families served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Attendance,
    Leave,
    Payroll,
    Incident,
    Equipment,
    Project,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown report kind: {0}")]
pub struct UnknownReportKind(pub String);

const ATTENDANCE_FIELDS: &[&str] = &[
    "id",
    "employee.user.firstName",
    "employee.user.lastName",
    "project.name",
    "project.client.name",
    "checkIn",
    "checkOut",
    "status",
];

const LEAVE_FIELDS: &[&str] = &[
    "id",
    "employee.user.firstName",
    "employee.user.lastName",
    "startDate",
    "endDate",
    "reason",
    "status",
    "approvedBy.user.firstName",
    "approvedBy.user.lastName",
];

const PAYROLL_FIELDS: &[&str] = &[
    "id",
    "employee.user.firstName",
    "employee.user.lastName",
    "month",
    "year",
    "basicSalary",
    "allowances",
    "deductions",
    "netSalary",
    "status",
];

const INCIDENT_FIELDS: &[&str] = &[
    "id",
    "project.name",
    "project.client.name",
    "reportedBy.user.firstName",
    "reportedBy.user.lastName",
    "assignedTo.user.firstName",
    "assignedTo.user.lastName",
    "title",
    "description",
    "severity",
    "status",
    "createdAt",
];

const EQUIPMENT_FIELDS: &[&str] = &[
    "id",
    "name",
    "type",
    "serialNumber",
    "status",
    "assignments.employee.user.firstName",
    "assignments.employee.user.lastName",
    "assignments.startDate",
    "assignments.endDate",
];

const PROJECT_FIELDS: &[&str] = &[
    "id",
    "name",
    "description",
    "client.name",
    "startDate",
    "endDate",
    "status",
    "numberOfGuards",
    "budget",
    "assignments.employee.user.firstName",
    "assignments.employee.user.lastName",
    "assignments.startDate",
    "assignments.endDate",
];

const CURRENCY_FIELDS: &[&str] = &["basicSalary", "allowances", "deductions", "netSalary", "budget"];

const DATE_FIELDS: &[&str] = &[
    "checkIn",
    "checkOut",
    "startDate",
    "endDate",
    "createdAt",
    "assignments.startDate",
    "assignments.endDate",
];

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::Attendance,
        ReportKind::Leave,
        ReportKind::Payroll,
        ReportKind::Incident,
        ReportKind::Equipment,
        ReportKind::Project,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Attendance => "attendance",
            ReportKind::Leave => "leave",
            ReportKind::Payroll => "payroll",
            ReportKind::Incident => "incident",
            ReportKind::Equipment => "equipment",
            ReportKind::Project => "project",
        }
    }

    /// Exported field paths in column order.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            ReportKind::Attendance => ATTENDANCE_FIELDS,
            ReportKind::Leave => LEAVE_FIELDS,
            ReportKind::Payroll => PAYROLL_FIELDS,
            ReportKind::Incident => INCIDENT_FIELDS,
            ReportKind::Equipment => EQUIPMENT_FIELDS,
            ReportKind::Project => PROJECT_FIELDS,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Attendance => "Attendance Report",
            ReportKind::Leave => "Leave Report",
            ReportKind::Payroll => "Payroll Report",
            ReportKind::Incident => "Incident Report",
            ReportKind::Equipment => "Equipment Report",
            ReportKind::Project => "Project Report",
        }
    }

    /// Download filename without extension.
    pub fn filename(&self) -> String {
        format!("{}-report", self.as_str())
    }

    /// Options for this report with a "Generated on M/D/YYYY" subtitle.
    pub fn options(&self, generated_on: NaiveDate) -> ExportOptions {
        let fields = self.fields();
        let mut options = ExportOptions::new(fields.iter().copied())
            .with_title(self.title())
            .with_subtitle(format!("Generated on {}", generated_on.format("%-m/%-d/%Y")));

        for field in fields {
            if CURRENCY_FIELDS.contains(field) {
                options = options.with_field_type(*field, FieldKind::Currency);
            } else if DATE_FIELDS.contains(field) {
                options = options.with_field_type(*field, FieldKind::Date);
            }
        }
        options
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = UnknownReportKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownReportKind(s.to_string()))
    }
}
