//! Role inference for the recommendation engine. Matching free-text
//! certification names to hiring roles is inherently fuzzy, so the rules
//! live behind a trait and the scoring pipeline never sees the tables.

/// Matching profile for one hiring role: generic keywords, the tooling
/// stack seen in postings, and the certification naming patterns that map
/// to it. Pattern hits count double when scoring tech alignment.
#[derive(Debug, Clone, Copy)]
pub struct RoleProfile {
    pub role: &'static str,
    pub keywords: &'static [&'static str],
    pub tech_stack: &'static [&'static str],
    pub cert_patterns: &'static [&'static str],
}

pub trait RoleClassifier {
    /// Profiles for every role tracked in the given domain; empty for an
    /// unknown domain (alignment then degrades to zero).
    fn profiles(&self, domain: &str) -> &[RoleProfile];

    fn profile_for_role(&self, domain: &str, role: &str) -> Option<&RoleProfile> {
        self.profiles(domain).iter().find(|p| p.role == role)
    }
}

/// Default classifier backed by the static per-domain tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl RoleClassifier for KeywordClassifier {
    fn profiles(&self, domain: &str) -> &[RoleProfile] {
        match domain {
            "CS/IT" | "CS / IT" => CS_IT_ROLES,
            "Engineering / Business" | "Engineering/Business" => ENGINEERING_BUSINESS_ROLES,
            "Healthcare" => HEALTHCARE_ROLES,
            "Finance" => FINANCE_ROLES,
            "Skilled Trades" | "Skilled-Trades" => SKILLED_TRADES_ROLES,
            _ => &[],
        }
    }
}

const CS_IT_ROLES: &[RoleProfile] = &[
    RoleProfile {
        role: "Cloud Engineer",
        keywords: &["cloud engineer", "aws", "azure", "gcp", "terraform", "kubernetes"],
        tech_stack: &["docker", "terraform", "ansible", "jenkins", "git"],
        cert_patterns: &["aws", "azure", "gcp", "kubernetes"],
    },
    RoleProfile {
        role: "DevOps Engineer",
        keywords: &["devops", "sre", "ci/cd", "kubernetes", "docker"],
        tech_stack: &["jenkins", "gitlab", "circleci", "docker", "kubernetes"],
        cert_patterns: &["docker", "kubernetes", "jenkins", "aws", "azure"],
    },
    RoleProfile {
        role: "Security Engineer",
        keywords: &["security engineer", "siem", "incident response", "cissp", "soc"],
        tech_stack: &["splunk", "wireshark", "nmap", "metasploit", "burp"],
        cert_patterns: &["cissp", "security+", "ceh", "cism"],
    },
    RoleProfile {
        role: "Data Engineer",
        keywords: &["data engineer", "etl", "spark", "snowflake", "bigquery", "redshift"],
        tech_stack: &["python", "sql", "spark", "kafka", "airflow"],
        cert_patterns: &["snowflake", "databricks", "aws", "gcp"],
    },
    RoleProfile {
        role: "Network Engineer",
        keywords: &["network engineer", "ccna", "bgp", "cisco"],
        tech_stack: &["cisco", "juniper", "palo alto", "fortinet"],
        cert_patterns: &["ccna", "ccnp", "jncia", "fortinet"],
    },
    RoleProfile {
        role: "Software Engineer",
        keywords: &["software engineer", "developer", "programming", "java", "python"],
        tech_stack: &["git", "docker", "kubernetes", "react", "node"],
        cert_patterns: &["aws", "azure", "oracle", "microsoft"],
    },
];

const ENGINEERING_BUSINESS_ROLES: &[RoleProfile] = &[
    RoleProfile {
        role: "Project Manager",
        keywords: &["project manager", "pmp", "agile", "scrum master"],
        tech_stack: &["jira", "confluence", "microsoft project", "slack"],
        cert_patterns: &["pmp", "capm", "safe", "scrum"],
    },
    RoleProfile {
        role: "Business Analyst",
        keywords: &["business analyst", "requirements", "process improvement"],
        tech_stack: &["excel", "tableau", "power bi", "visio"],
        cert_patterns: &["pmp", "six sigma", "lean"],
    },
    RoleProfile {
        role: "Quality Engineer",
        keywords: &["quality engineer", "six sigma", "cqe", "asq"],
        tech_stack: &["minitab", "r", "spc", "lean tools"],
        cert_patterns: &["six sigma", "lean", "cqe", "asq"],
    },
    RoleProfile {
        role: "Civil Engineer",
        keywords: &["civil engineer", "pe", "structural"],
        tech_stack: &["autocad", "revit", "civil 3d", "staad"],
        cert_patterns: &["pe", "se", "leed"],
    },
];

const HEALTHCARE_ROLES: &[RoleProfile] = &[
    RoleProfile {
        role: "Registered Nurse (RN)",
        keywords: &["registered nurse", "rn", "nurse"],
        tech_stack: &["epic", "cerner", "meditech"],
        cert_patterns: &["rn", "nclex", "bls", "acls"],
    },
    RoleProfile {
        role: "Nurse Practitioner (NP)",
        keywords: &["nurse practitioner", "np"],
        tech_stack: &["epic", "cerner"],
        cert_patterns: &["np", "fnp", "aanp", "ancc"],
    },
    RoleProfile {
        role: "Emergency Medical Technician (EMT)",
        keywords: &["emt", "emergency medical technician"],
        tech_stack: &["zoll", "lifepak"],
        cert_patterns: &["emt", "nremt"],
    },
    RoleProfile {
        role: "Paramedic",
        keywords: &["paramedic"],
        tech_stack: &["zoll", "lifepak"],
        cert_patterns: &["paramedic", "nrp", "acls"],
    },
    RoleProfile {
        role: "Radiologic Technologist",
        keywords: &["radiologic technologist", "rad tech"],
        tech_stack: &["pacs", "dicom"],
        cert_patterns: &["arrt", "radiography"],
    },
    RoleProfile {
        role: "Respiratory Therapist",
        keywords: &["respiratory therapist"],
        tech_stack: &["ventilator", "cpap"],
        cert_patterns: &["crt", "rrt", "nbrc"],
    },
    RoleProfile {
        role: "Pharmacist",
        keywords: &["pharmacist", "pharmd"],
        tech_stack: &["epic", "pyxis"],
        cert_patterns: &["naplex", "bcps"],
    },
    RoleProfile {
        role: "Pharmacy Technician",
        keywords: &["pharmacy technician", "cpht"],
        tech_stack: &["pyxis", "omnicell"],
        cert_patterns: &["cpht", "ptcb"],
    },
    RoleProfile {
        role: "Public Health Specialist",
        keywords: &["public health", "epidemiology"],
        tech_stack: &["sas", "r", "redcap"],
        cert_patterns: &["ces", "cph"],
    },
    RoleProfile {
        role: "Infection Control Specialist",
        keywords: &["infection control", "cic"],
        tech_stack: &["epic", "nhsn"],
        cert_patterns: &["cic", "cbic"],
    },
    RoleProfile {
        role: "Critical Care Nurse (CCRN)",
        keywords: &["critical care", "ccrn", "icu"],
        tech_stack: &["epic", "philips"],
        cert_patterns: &["ccrn", "acls"],
    },
];

const FINANCE_ROLES: &[RoleProfile] = &[
    RoleProfile {
        role: "Financial Analyst",
        keywords: &["financial analyst", "equity research"],
        tech_stack: &["excel", "bloomberg", "factset"],
        cert_patterns: &["cfa", "series 7"],
    },
    RoleProfile {
        role: "Portfolio Manager",
        keywords: &["portfolio manager", "buy-side", "sell-side"],
        tech_stack: &["bloomberg", "aladdin", "python"],
        cert_patterns: &["cfa", "caia"],
    },
    RoleProfile {
        role: "Risk Analyst",
        keywords: &["risk analyst", "market risk", "credit risk", "frm"],
        tech_stack: &["sas", "python", "matlab"],
        cert_patterns: &["frm", "prm", "cfa"],
    },
    RoleProfile {
        role: "Quantitative Analyst",
        keywords: &["quantitative analyst", "quant", "statistics"],
        tech_stack: &["python", "r", "c++", "matlab"],
        cert_patterns: &["cqf", "frm"],
    },
    RoleProfile {
        role: "Compliance/AML Specialist",
        keywords: &["compliance", "aml", "kyc"],
        tech_stack: &["actimize", "lexisnexis"],
        cert_patterns: &["cams", "cfe"],
    },
    RoleProfile {
        role: "Internal Auditor",
        keywords: &["internal auditor", "cia"],
        tech_stack: &["acl", "idea", "excel"],
        cert_patterns: &["cia", "cpa"],
    },
    RoleProfile {
        role: "Information Systems Auditor",
        keywords: &["cisa", "it auditor", "systems auditor"],
        tech_stack: &["acl", "sap", "oracle"],
        cert_patterns: &["cisa", "crisc"],
    },
    RoleProfile {
        role: "Management Accountant",
        keywords: &["cma", "management accountant"],
        tech_stack: &["sap", "oracle", "excel"],
        cert_patterns: &["cma", "cpa"],
    },
    RoleProfile {
        role: "Tax Accountant",
        keywords: &["tax accountant", "cpa"],
        tech_stack: &["quickbooks", "lacerte", "excel"],
        cert_patterns: &["cpa", "ea"],
    },
    RoleProfile {
        role: "Financial Advisor / Planner",
        keywords: &["financial advisor", "planner", "cfp"],
        tech_stack: &["emoney", "morningstar"],
        cert_patterns: &["cfp", "series 65"],
    },
];

const SKILLED_TRADES_ROLES: &[RoleProfile] = &[
    RoleProfile {
        role: "Electrician",
        keywords: &["electrician", "journeyman", "electrical"],
        tech_stack: &["conduit", "nec code"],
        cert_patterns: &["journeyman", "master electrician"],
    },
    RoleProfile {
        role: "HVAC Technician",
        keywords: &["hvac", "refrigeration", "epa 608"],
        tech_stack: &["refrigerant", "ductwork"],
        cert_patterns: &["epa 608", "nate", "hvac"],
    },
    RoleProfile {
        role: "Welder",
        keywords: &["welder", "welding", "aws d1.1"],
        tech_stack: &["mig", "tig", "stick"],
        cert_patterns: &["cws", "aws", "welding"],
    },
    RoleProfile {
        role: "Construction Worker",
        keywords: &["construction", "osha", "carpenter"],
        tech_stack: &["blueprints", "osha 30"],
        cert_patterns: &["osha", "nccer"],
    },
    RoleProfile {
        role: "Safety Inspector",
        keywords: &["safety inspector", "osha", "chst"],
        tech_stack: &["osha 30", "incident reporting"],
        cert_patterns: &["osha", "chst", "csp"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tracked_domain_has_profiles() {
        let classifier = KeywordClassifier;
        for domain in [
            "CS/IT",
            "Engineering / Business",
            "Healthcare",
            "Finance",
            "Skilled Trades",
        ] {
            assert!(!classifier.profiles(domain).is_empty(), "{domain}");
        }
    }

    #[test]
    fn unknown_domain_yields_no_profiles() {
        assert!(KeywordClassifier.profiles("Culinary").is_empty());
    }

    #[test]
    fn profile_lookup_by_role_name() {
        let classifier = KeywordClassifier;
        let profile = classifier.profile_for_role("CS/IT", "Cloud Engineer").unwrap();
        assert!(profile.keywords.contains(&"aws"));
        assert!(classifier.profile_for_role("CS/IT", "Barista").is_none());
    }
}
