pub mod authorization_service;
pub mod checklist_service;
pub mod diagnosis_service;
pub mod fuel_ledger;
pub mod report_service;
