//! Document type registry.
//!
//! Every type code maps to one display name, one default business domain
//! and an optional set of extra validation rules. The table replaces one
//! wrapper struct per type code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Business-area classification of a document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusinessDomain {
    Strategic,
    Market,
    Customer,
    Product,
    BusinessModel,
    Operations,
    Technology,
    Financial,
    Risk,
    Growth,
}

impl BusinessDomain {
    pub const ALL: [BusinessDomain; 10] = [
        Self::Strategic,
        Self::Market,
        Self::Customer,
        Self::Product,
        Self::BusinessModel,
        Self::Operations,
        Self::Technology,
        Self::Financial,
        Self::Risk,
        Self::Growth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strategic => "strategic",
            Self::Market => "market",
            Self::Customer => "customer",
            Self::Product => "product",
            Self::BusinessModel => "business-model",
            Self::Operations => "operations",
            Self::Technology => "technology",
            Self::Financial => "financial",
            Self::Risk => "risk",
            Self::Growth => "growth",
        }
    }
}

impl fmt::Display for BusinessDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == lower)
            .ok_or_else(|| format!("unknown business domain: {s}"))
    }
}

/// Marker carried by a handful of types that have an extra obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeFlag {
    StrategicFoundation,
    CustomerFocused,
    BusinessModelCore,
    RiskManagement,
}

impl TypeFlag {
    /// Frontmatter key the flag is exposed under.
    pub fn key(&self) -> &'static str {
        match self {
            Self::StrategicFoundation => "strategic_foundation",
            Self::CustomerFocused => "customer_focused",
            Self::BusinessModelCore => "business_model_core",
            Self::RiskManagement => "risk_management",
        }
    }
}

/// Extra rule a document type imposes on top of base validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRule {
    /// `success_criteria` must be a non-empty list.
    RequireSuccessCriteria,
    /// `related` must be a non-empty list.
    RequireRelated,
    /// `metrics` must be a non-empty list.
    RequireMetrics,
    /// Some `related` entry must start with the prefix.
    RequireRelatedPrefix(&'static str),
}

impl TypeRule {
    /// Message reported when the rule is violated.
    pub fn message(&self) -> &'static str {
        match self {
            Self::RequireSuccessCriteria => {
                "Strategic foundation documents must have success_criteria defined"
            }
            Self::RequireRelated => {
                "Customer understanding documents should reference related personas or jobs-to-be-done"
            }
            Self::RequireMetrics => {
                "Business model documents must have metrics defined for measurement"
            }
            Self::RequireRelatedPrefix("MIT-") => {
                "Risk documents should reference corresponding mitigation documents"
            }
            Self::RequireRelatedPrefix("RSK-") => {
                "Mitigation documents should reference corresponding risk documents"
            }
            Self::RequireRelatedPrefix(_) => "Document must reference a required related document",
        }
    }
}

/// One row of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSpec {
    pub code: &'static str,
    pub name: &'static str,
    pub purpose: &'static str,
    pub domain: BusinessDomain,
    pub flag: Option<TypeFlag>,
    pub rules: &'static [TypeRule],
}

const fn spec(
    code: &'static str,
    name: &'static str,
    purpose: &'static str,
    domain: BusinessDomain,
    flag: Option<TypeFlag>,
    rules: &'static [TypeRule],
) -> TypeSpec {
    TypeSpec {
        code,
        name,
        purpose,
        domain,
        flag,
        rules,
    }
}

const BUILTIN_TYPES: &[TypeSpec] = &[
    // Strategic
    spec("MOT", "Moats", "Competitive advantages that protect market position", BusinessDomain::Strategic, None, &[]),
    spec("MSN", "Mission", "Why the organization exists and its core purpose", BusinessDomain::Strategic, Some(TypeFlag::StrategicFoundation), &[TypeRule::RequireSuccessCriteria]),
    spec("OBJ", "Objectives", "Specific, measurable goals with timeframes (OKRs)", BusinessDomain::Strategic, None, &[]),
    spec("PUR", "Purpose", "Social impact and stakeholder value beyond profit", BusinessDomain::Strategic, None, &[]),
    spec("STR", "Strategy", "How the organization will achieve its vision and compete", BusinessDomain::Strategic, None, &[]),
    spec("THY", "Theory of Change", "Logic model connecting activities to outcomes", BusinessDomain::Strategic, None, &[]),
    spec("VSN", "Vision", "The future state the organization aims to create", BusinessDomain::Strategic, Some(TypeFlag::StrategicFoundation), &[TypeRule::RequireSuccessCriteria]),
    // Market
    spec("ECO", "Ecosystem", "Partners, suppliers, distributors, and ecosystem players", BusinessDomain::Market, None, &[]),
    spec("MAC", "Macro Environment", "Economic, political, social, technological factors", BusinessDomain::Market, None, &[]),
    spec("MKT", "Market Definition", "TAM/SAM/SOM, market boundaries and sizing", BusinessDomain::Market, None, &[]),
    spec("OPP", "Opportunities", "Identified market gaps and growth potential", BusinessDomain::Market, None, &[]),
    spec("POS", "Positioning", "Unique value proposition and market position", BusinessDomain::Market, None, &[]),
    spec("REG", "Regulatory Environment", "Laws, regulations, and compliance requirements", BusinessDomain::Market, None, &[]),
    spec("SEG", "Market Segments", "Customer categories and targeting strategy", BusinessDomain::Market, None, &[]),
    spec("THR", "Threats", "External risks to market position and business model", BusinessDomain::Market, None, &[]),
    spec("TRN", "Trends", "Market forces and changes shaping the industry", BusinessDomain::Market, None, &[]),
    // Customer
    spec("BEH", "Behaviors", "Customer usage patterns and behavioral insights", BusinessDomain::Customer, None, &[]),
    spec("CJM", "Customer Journey", "End-to-end experience from awareness to advocacy", BusinessDomain::Customer, None, &[]),
    spec("EMP", "Empathy Maps", "Deep understanding of customer thoughts and feelings", BusinessDomain::Customer, None, &[]),
    spec("FEE", "Feedback", "Customer input, reviews, and satisfaction data", BusinessDomain::Customer, None, &[]),
    spec("GAI", "Gains", "Benefits and value customers receive", BusinessDomain::Customer, None, &[]),
    spec("JTB", "Jobs-to-be-Done", "Specific outcomes customers hire products to achieve", BusinessDomain::Customer, Some(TypeFlag::CustomerFocused), &[TypeRule::RequireRelated]),
    spec("PAI", "Pain Points", "Customer problems and frustrations being solved", BusinessDomain::Customer, None, &[]),
    spec("STO", "User Stories", "Individual requirements from user perspective", BusinessDomain::Customer, None, &[]),
    spec("SUR", "Surveys", "Quantitative customer research and data", BusinessDomain::Customer, None, &[]),
    spec("USE", "Use Cases", "Specific scenarios where customers apply the solution", BusinessDomain::Customer, None, &[]),
    // Product
    spec("FEA", "Features", "Specific capabilities of products and services", BusinessDomain::Product, None, &[]),
    spec("INT", "Integrations", "Connections with other systems and platforms", BusinessDomain::Product, None, &[]),
    spec("PER", "Performance", "Speed, reliability, and performance characteristics", BusinessDomain::Product, Some(TypeFlag::CustomerFocused), &[TypeRule::RequireRelated]),
    spec("PRD", "Products", "Physical or digital products offered", BusinessDomain::Product, None, &[]),
    spec("QUA", "Quality Standards", "Quality metrics, testing, and assurance practices", BusinessDomain::Product, None, &[]),
    spec("REQ", "Requirements", "Functional and non-functional specifications", BusinessDomain::Product, None, &[]),
    spec("ROD", "Roadmap", "Planned development and enhancement timeline", BusinessDomain::Product, None, &[]),
    spec("SUP", "Support", "Customer support and success processes", BusinessDomain::Product, None, &[]),
    spec("SVC", "Services", "Service offerings and support capabilities", BusinessDomain::Product, None, &[]),
    spec("UXD", "User Experience", "Design principles and user interface standards", BusinessDomain::Product, None, &[]),
    // BusinessModel
    spec("ACT", "Key Activities", "Essential processes for value creation", BusinessDomain::BusinessModel, None, &[]),
    spec("BMC", "Business Model Canvas", "Complete business model overview", BusinessDomain::BusinessModel, None, &[]),
    spec("CAC", "Customer Acquisition Cost", "Cost to acquire a customer by channel and segment", BusinessDomain::BusinessModel, None, &[]),
    spec("CHN", "Channels", "Distribution and sales channel strategy", BusinessDomain::BusinessModel, None, &[]),
    spec("CST", "Cost Structure", "Major cost categories and cost drivers", BusinessDomain::BusinessModel, Some(TypeFlag::BusinessModelCore), &[TypeRule::RequireMetrics]),
    spec("LTV", "Lifetime Value", "Customer lifetime value models and drivers", BusinessDomain::BusinessModel, None, &[]),
    spec("PRT", "Key Partnerships", "Strategic alliances and supplier relationships", BusinessDomain::BusinessModel, None, &[]),
    spec("REL", "Customer Relationships", "How relationships are built and maintained", BusinessDomain::BusinessModel, None, &[]),
    spec("RES", "Key Resources", "Critical assets required for the business model", BusinessDomain::BusinessModel, None, &[]),
    spec("REV", "Revenue Streams", "How money is generated from customers", BusinessDomain::BusinessModel, Some(TypeFlag::BusinessModelCore), &[TypeRule::RequireMetrics]),
    spec("UNT", "Unit Economics", "Per-customer or per-unit financial metrics", BusinessDomain::BusinessModel, None, &[]),
    // Operations
    spec("CAP", "Capabilities", "Organizational capabilities and maturity", BusinessDomain::Operations, None, &[]),
    spec("FAC", "Facilities", "Physical spaces, equipment, and infrastructure", BusinessDomain::Operations, None, &[]),
    spec("ORG", "Organization", "Reporting relationships and organizational design", BusinessDomain::Operations, None, &[]),
    spec("POL", "Policies", "Rules and guidelines governing behavior", BusinessDomain::Operations, None, &[]),
    spec("PRC", "Processes", "Repeatable workflows that drive business outcomes", BusinessDomain::Operations, None, &[]),
    spec("ROL", "Roles", "Individual position definitions and responsibilities", BusinessDomain::Operations, None, &[]),
    spec("SKI", "Skills", "Required capabilities and competency frameworks", BusinessDomain::Operations, None, &[]),
    spec("SLA", "Service Levels", "Performance commitments and standards", BusinessDomain::Operations, None, &[]),
    spec("TEA", "Teams", "Team charters, composition, and responsibilities", BusinessDomain::Operations, None, &[]),
    spec("TOO", "Tools", "Software, systems, and operational tools", BusinessDomain::Operations, None, &[]),
    spec("VND", "Vendors", "Supplier and partner relationship management", BusinessDomain::Operations, None, &[]),
    spec("WFL", "Workflows", "Detailed task sequences within processes", BusinessDomain::Operations, None, &[]),
    // Technology
    spec("ANA", "Analytics", "Data analytics, business intelligence, and insights", BusinessDomain::Technology, None, &[]),
    spec("API", "APIs", "Interface specifications, protocols, and integrations", BusinessDomain::Technology, None, &[]),
    spec("ARC", "Architecture", "High-level system design and component relationships", BusinessDomain::Technology, None, &[]),
    spec("DAT", "Data Models", "Data structures, schemas, and information architecture", BusinessDomain::Technology, None, &[]),
    spec("DEV", "Development", "Software development lifecycle and practices", BusinessDomain::Technology, None, &[]),
    spec("INF", "Infrastructure", "Deployment, hosting, and runtime environment", BusinessDomain::Technology, None, &[]),
    spec("SEC", "Security", "Security architecture, controls, and compliance", BusinessDomain::Technology, None, &[]),
    spec("SYS", "Systems", "Systems inventory, ownership, and boundaries", BusinessDomain::Technology, None, &[]),
    // Financial
    spec("AUD", "Audit", "Financial controls, compliance, and audit processes", BusinessDomain::Financial, None, &[]),
    spec("BUD", "Budget", "Resource allocation and spending plans", BusinessDomain::Financial, None, &[]),
    spec("FIN", "Financial Model", "Comprehensive P&L, balance sheet, cash flow projections", BusinessDomain::Financial, None, &[]),
    spec("FND", "Funding", "Capital requirements and financing strategy", BusinessDomain::Financial, None, &[]),
    spec("FOR", "Forecasts", "Forward-looking financial predictions and scenarios", BusinessDomain::Financial, None, &[]),
    spec("INV", "Investment", "Capital allocation and investment decisions", BusinessDomain::Financial, None, &[]),
    spec("MET", "Metrics", "Key performance indicators and measurement frameworks", BusinessDomain::Financial, None, &[]),
    spec("REP", "Reporting", "Financial reporting and dashboard requirements", BusinessDomain::Financial, None, &[]),
    spec("TAX", "Tax Strategy", "Tax planning, structure, and compliance", BusinessDomain::Financial, None, &[]),
    spec("VAL", "Valuation", "Business valuation models and assumptions", BusinessDomain::Financial, Some(TypeFlag::StrategicFoundation), &[TypeRule::RequireSuccessCriteria]),
    // Risk
    spec("CMP", "Compliance", "Regulatory obligations and adherence requirements", BusinessDomain::Risk, None, &[]),
    spec("CRI", "Crisis Management", "Crisis response and business continuity plans", BusinessDomain::Risk, None, &[]),
    spec("CTL", "Controls", "Internal controls and process safeguards", BusinessDomain::Risk, None, &[]),
    spec("ETH", "Ethics", "Ethical guidelines and moral standards", BusinessDomain::Risk, None, &[]),
    spec("GVN", "Governance", "Decision-making structure and oversight", BusinessDomain::Risk, None, &[]),
    spec("MIT", "Mitigations", "Risk response strategies and controls", BusinessDomain::Risk, Some(TypeFlag::RiskManagement), &[TypeRule::RequireRelatedPrefix("RSK-")]),
    spec("RSK", "Risks", "Identified threats to business success", BusinessDomain::Risk, Some(TypeFlag::RiskManagement), &[TypeRule::RequireRelatedPrefix("MIT-")]),
    spec("STA", "Stakeholders", "Stakeholder mapping and management", BusinessDomain::Risk, None, &[]),
    // Growth
    spec("ACQ", "Acquisitions", "M&A strategy and integration planning", BusinessDomain::Growth, None, &[]),
    spec("EXP", "Expansion", "Geographic, market, or product expansion plans", BusinessDomain::Growth, None, &[]),
    spec("GRW", "Growth Model", "How the business scales customers and revenue", BusinessDomain::Growth, None, &[]),
    spec("GTM", "Go-to-Market", "Launch and customer acquisition strategy", BusinessDomain::Growth, None, &[]),
    spec("INN", "Innovation", "Future product and service development pipeline", BusinessDomain::Growth, None, &[]),
    spec("RND", "Research", "Investigation and development activities", BusinessDomain::Growth, None, &[]),
    spec("SCL", "Scaling", "Operational scaling approach and constraints", BusinessDomain::Growth, None, &[]),
];

static BUILTIN: TypeRegistry = TypeRegistry {
    specs: BUILTIN_TYPES,
};

/// Lookup table from type code to [`TypeSpec`].
#[derive(Debug, Clone, Copy)]
pub struct TypeRegistry {
    specs: &'static [TypeSpec],
}

impl TypeRegistry {
    /// Registry over a custom table.
    pub const fn new(specs: &'static [TypeSpec]) -> Self {
        Self { specs }
    }

    /// The built-in document type table.
    pub fn builtin() -> &'static TypeRegistry {
        &BUILTIN
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, code: &str) -> Option<&'static TypeSpec> {
        self.specs.iter().find(|s| s.code == code)
    }

    /// Default domain for a code; unknown codes fall back to strategic.
    pub fn default_domain(&self, code: &str) -> BusinessDomain {
        self.lookup(code)
            .map(|s| s.domain)
            .unwrap_or(BusinessDomain::Strategic)
    }

    pub fn codes(&self) -> impl Iterator<Item = &'static str> {
        self.specs.iter().map(|s| s.code)
    }

    pub fn for_domain(&self, domain: BusinessDomain) -> impl Iterator<Item = &'static TypeSpec> {
        self.specs.iter().filter(move |s| s.domain == domain)
    }

    /// Case-insensitive search over code, name and purpose.
    pub fn search(&self, term: &str) -> Vec<&'static TypeSpec> {
        let term = term.to_lowercase();
        self.specs
            .iter()
            .filter(|s| {
                s.code.to_lowercase().contains(&term)
                    || s.name.to_lowercase().contains(&term)
                    || s.purpose.to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
