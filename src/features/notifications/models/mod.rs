mod event;

pub use event::{
    citizen_contact, ClientEvent, DeletedReportEvent, DirectMessage, ReportEvent, ServerEvent,
};
