//! Static industry catalog offered during onboarding.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Industry {
    pub id: &'static str,
    pub name: &'static str,
    pub sub_industries: &'static [&'static str],
}

pub const INDUSTRIES: &[Industry] = &[
    Industry {
        id: "technology",
        name: "Technology",
        sub_industries: &[
            "Software Engineering",
            "Data Science & Analytics",
            "Cybersecurity",
            "Cloud Computing",
            "DevOps/SRE",
            "Mobile Development",
            "Web Development",
            "Artificial Intelligence/ML",
            "Product Management",
            "UX/UI Design",
            "Quality Assurance",
            "IT Infrastructure",
            "Blockchain/Web3",
            "Game Development",
        ],
    },
    Industry {
        id: "healthcare",
        name: "Healthcare",
        sub_industries: &[
            "Nursing",
            "Medical Practice",
            "Healthcare Administration",
            "Medical Research",
            "Pharmacy",
            "Physical Therapy",
            "Mental Health",
            "Medical Technology",
            "Healthcare IT",
            "Public Health",
            "Biomedical Engineering",
            "Healthcare Consulting",
        ],
    },
    Industry {
        id: "finance-banking",
        name: "Finance & Banking",
        sub_industries: &[
            "Investment Banking",
            "Commercial Banking",
            "Financial Planning",
            "Insurance",
            "Risk Management",
            "Financial Analysis",
            "Accounting",
            "Corporate Finance",
            "Fintech",
            "Wealth Management",
            "Credit Analysis",
            "Compliance",
        ],
    },
    Industry {
        id: "marketing-advertising",
        name: "Marketing & Advertising",
        sub_industries: &[
            "Digital Marketing",
            "Content Marketing",
            "Social Media Marketing",
            "Brand Management",
            "Public Relations",
            "Market Research",
            "SEO/SEM",
            "Email Marketing",
            "Creative Direction",
            "Media Planning",
            "Growth Marketing",
            "Marketing Analytics",
        ],
    },
    Industry {
        id: "education",
        name: "Education",
        sub_industries: &[
            "K-12 Teaching",
            "Higher Education",
            "Educational Administration",
            "Curriculum Development",
            "Educational Technology",
            "Special Education",
            "Training & Development",
            "Online Education",
            "Educational Consulting",
            "Academic Research",
        ],
    },
    Industry {
        id: "sales",
        name: "Sales",
        sub_industries: &[
            "B2B Sales",
            "B2C Sales",
            "Inside Sales",
            "Field Sales",
            "Sales Management",
            "Business Development",
            "Customer Success",
            "Sales Engineering",
            "Retail Sales",
            "Account Management",
            "Sales Operations",
        ],
    },
    Industry {
        id: "engineering",
        name: "Engineering",
        sub_industries: &[
            "Mechanical Engineering",
            "Electrical Engineering",
            "Civil Engineering",
            "Chemical Engineering",
            "Aerospace Engineering",
            "Environmental Engineering",
            "Industrial Engineering",
            "Biomedical Engineering",
            "Materials Engineering",
            "Systems Engineering",
        ],
    },
    Industry {
        id: "human-resources",
        name: "Human Resources",
        sub_industries: &[
            "Talent Acquisition",
            "HR Business Partner",
            "Compensation & Benefits",
            "Employee Relations",
            "HR Analytics",
            "Organizational Development",
            "Training & Development",
            "HR Operations",
            "Diversity & Inclusion",
            "Performance Management",
        ],
    },
    Industry {
        id: "legal",
        name: "Legal",
        sub_industries: &[
            "Corporate Law",
            "Criminal Law",
            "Family Law",
            "Intellectual Property",
            "Employment Law",
            "Real Estate Law",
            "Tax Law",
            "Immigration Law",
            "Environmental Law",
            "Contract Law",
            "Compliance",
        ],
    },
    Industry {
        id: "consulting",
        name: "Consulting",
        sub_industries: &[
            "Management Consulting",
            "Strategy Consulting",
            "IT Consulting",
            "Financial Consulting",
            "HR Consulting",
            "Operations Consulting",
            "Marketing Consulting",
            "Technology Consulting",
            "Business Analysis",
            "Change Management",
        ],
    },
    Industry {
        id: "manufacturing",
        name: "Manufacturing",
        sub_industries: &[
            "Production Management",
            "Quality Control",
            "Supply Chain",
            "Operations Management",
            "Process Engineering",
            "Logistics",
            "Plant Management",
            "Safety Management",
            "Maintenance",
            "Lean Manufacturing",
        ],
    },
    Industry {
        id: "real-estate",
        name: "Real Estate",
        sub_industries: &[
            "Residential Sales",
            "Commercial Real Estate",
            "Property Management",
            "Real Estate Development",
            "Real Estate Investment",
            "Mortgage Banking",
            "Property Valuation",
            "Construction Management",
            "Facilities Management",
        ],
    },
    Industry {
        id: "media-entertainment",
        name: "Media & Entertainment",
        sub_industries: &[
            "Film & Television",
            "Music Industry",
            "Publishing",
            "Journalism",
            "Broadcasting",
            "Gaming",
            "Social Media",
            "Content Creation",
            "Event Management",
            "Sports Management",
        ],
    },
    Industry {
        id: "retail-ecommerce",
        name: "Retail & E-commerce",
        sub_industries: &[
            "Store Management",
            "Merchandising",
            "E-commerce Operations",
            "Supply Chain",
            "Customer Service",
            "Inventory Management",
            "Visual Merchandising",
            "Buying & Procurement",
            "Category Management",
        ],
    },
    Industry {
        id: "non-profit",
        name: "Non-Profit",
        sub_industries: &[
            "Program Management",
            "Fundraising",
            "Grant Writing",
            "Community Outreach",
            "Volunteer Management",
            "Social Services",
            "Advocacy",
            "Research",
            "Development",
            "Operations",
        ],
    },
];

pub fn find_industry(id: &str) -> Option<&'static Industry> {
    INDUSTRIES.iter().find(|industry| industry.id == id)
}

/// Composes the stored industry key, e.g. `technology-software-engineering`.
/// Returns `None` unless `sub_industry` belongs to the industry `id`.
pub fn industry_key(id: &str, sub_industry: &str) -> Option<String> {
    let industry = find_industry(id)?;
    let sub = industry
        .sub_industries
        .iter()
        .find(|s| s.eq_ignore_ascii_case(sub_industry.trim()))?;
    Some(format!(
        "{}-{}",
        industry.id,
        sub.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_fifteen_industries_with_unique_ids() {
        assert_eq!(INDUSTRIES.len(), 15);
        let mut ids: Vec<_> = INDUSTRIES.iter().map(|i| i.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 15);
        assert!(INDUSTRIES.iter().all(|i| !i.sub_industries.is_empty()));
    }

    #[test]
    fn test_industry_key_composes_slug() {
        assert_eq!(
            industry_key("technology", "Software Engineering").as_deref(),
            Some("technology-software-engineering")
        );
        assert_eq!(
            industry_key("finance-banking", "investment banking").as_deref(),
            Some("finance-banking-investment-banking")
        );
    }

    #[test]
    fn test_industry_key_rejects_unknown_pairs() {
        assert!(industry_key("technology", "Nursing").is_none());
        assert!(industry_key("astrology", "Tarot").is_none());
    }
}
