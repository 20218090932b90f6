mod report_notifier;

pub use report_notifier::ReportNotifier;
