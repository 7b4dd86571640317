//! Page copy shared by every presenter.

pub const PAGE_TITLE: &str = "Health Facility Performance Dashboard";
pub const PAGE_INTRO: &str = "Key performance indicators (KPIs) for healthcare facilities, \
based on clinical, governance and operational data.";

pub const GOVERNANCE_HEADING: &str = "1. Governance & Compliance";
pub const GOVERNANCE_NOTE: &str = "Criterion analyzed: existence of a newborn care protocol.";
pub const PROTOCOL_CHART_TITLE: &str = "Newborn Protocol Status";
pub const COMPLIANT_TABLE_TITLE: &str = "Compliant facilities";

pub const CLINICAL_HEADING: &str = "2. Clinical Indicators (Maternity)";
pub const MONTHLY_CHART_TITLE: &str = "Live Births per Month";
pub const DISTRICT_CHART_TITLE: &str = "Live Births by District (Total)";

pub const OPERATIONS_HEADING: &str = "3. Availability of Critical Resources (Oxygen)";
pub const OXYGEN_CHART_TITLE: &str = "Top Facilities by Oxygen Availability";

pub const LOAD_ERROR_TITLE: &str = "Data unavailable";
pub const FOOTER: &str = "Health facility performance dashboard";
