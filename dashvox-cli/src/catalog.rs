// Dashboard question catalog
// Every figure here is a fixed literal; nothing is computed from live data.

/// Business area a question belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Sales,
    Payments,
    Marketing,
    Logistics,
}

impl Topic {
    pub fn label(&self) -> &'static str {
        match self {
            Topic::Sales => "Sales",
            Topic::Payments => "Payments",
            Topic::Marketing => "Marketing",
            Topic::Logistics => "Logistics",
        }
    }
}

/// What gets revealed on screen while the answer is spoken
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    BarChart {
        title: &'static str,
        labels: &'static [&'static str],
        values: &'static [u64],
    },
    Value(&'static str),
    Table {
        headers: &'static [&'static str],
        rows: &'static [&'static [&'static str]],
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: &'static str,
    pub topic: Topic,
    pub question: &'static str,
    pub answer: &'static str,
    pub visual: Visual,
    /// Ids of related entries
    pub follow_ups: &'static [&'static str],
}

static ENTRIES: &[Entry] = &[
    Entry {
        id: "funnel",
        topic: Topic::Sales,
        question: "What is my conversion funnel?",
        answer: "Out of 1000 leads, 800 were contacted, 500 took a demo and 200 were won.",
        visual: Visual::BarChart {
            title: "Conversion Funnel",
            labels: &["Leads", "Contacted", "Demo", "Won"],
            values: &[1000, 800, 500, 200],
        },
        follow_ups: &["conversion-rate", "lead-source"],
    },
    Entry {
        id: "revenue",
        topic: Topic::Payments,
        question: "How much revenue did I process through Cards/UPI/Netbanking/COD/Others?",
        answer: "Cards brought in 4000, UPI 3000, Netbanking 2000, COD 1000 and Others 500.",
        visual: Visual::BarChart {
            title: "Revenue",
            labels: &["Cards", "UPI", "Netbanking", "COD", "Others"],
            values: &[4000, 3000, 2000, 1000, 500],
        },
        follow_ups: &["sr", "failed-transactions"],
    },
    Entry {
        id: "conversion-rate",
        topic: Topic::Sales,
        question: "What is my conversion rate?",
        answer: "Your conversion rate is 20.00%.",
        visual: Visual::Value("20.00%"),
        follow_ups: &["funnel"],
    },
    Entry {
        id: "lead-source",
        topic: Topic::Marketing,
        question: "What is the source of my leads?",
        answer: "400 leads came from organic search, 300 from paid, 200 from referrals and 100 were direct.",
        visual: Visual::BarChart {
            title: "Lead Source",
            labels: &["Organic", "Paid", "Referral", "Direct"],
            values: &[400, 300, 200, 100],
        },
        follow_ups: &["marketing-channels"],
    },
    Entry {
        id: "marketing-channels",
        topic: Topic::Marketing,
        question: "Can you provide marketing channel performance?",
        answer: "SEO leads with 300, followed by Google Ads at 250, Facebook at 200, Email at 150 and Affiliates at 100.",
        visual: Visual::BarChart {
            title: "Marketing Channel Performance",
            labels: &["Google Ads", "Facebook", "SEO", "Email", "Affiliates"],
            values: &[250, 200, 300, 150, 100],
        },
        follow_ups: &["roas"],
    },
    Entry {
        id: "roas",
        topic: Topic::Marketing,
        question: "What is my ROAS?",
        answer: "Your Return on Ad Spend is 4.5x.",
        visual: Visual::Value("4.5x"),
        follow_ups: &["marketing-channels"],
    },
    Entry {
        id: "sr",
        topic: Topic::Payments,
        question: "What is my SR?",
        answer: "Your payment success rate is 85%.",
        visual: Visual::Value("85%"),
        follow_ups: &["failed-transactions"],
    },
    Entry {
        id: "failed-transactions",
        topic: Topic::Payments,
        question: "How many failed transactions did I have?",
        answer: "You had 1,234 failed transactions.",
        visual: Visual::Value("1,234"),
        follow_ups: &["sr"],
    },
    Entry {
        id: "courier-performance",
        topic: Topic::Logistics,
        question: "How are my couriers performing?",
        answer: "Delhivery delivered 96% of its shipments on time, Bluedart 94% and Ecom Express 89%.",
        visual: Visual::Table {
            headers: &["Courier", "Shipments", "On time", "RTO"],
            rows: &[
                &["Delhivery", "1,200", "96%", "2.1%"],
                &["Bluedart", "850", "94%", "2.8%"],
                &["Ecom Express", "640", "89%", "4.5%"],
            ],
        },
        follow_ups: &[],
    },
];

pub fn entries() -> &'static [Entry] {
    ENTRIES
}

pub fn by_id(id: &str) -> Option<&'static Entry> {
    ENTRIES.iter().find(|e| e.id == id)
}

/// Look up by id, 1-based position, or question text (case-insensitive, substring).
pub fn find(query: &str) -> Option<&'static Entry> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    if let Some(entry) = ENTRIES.iter().find(|e| e.id.eq_ignore_ascii_case(query)) {
        return Some(entry);
    }

    if let Ok(index) = query.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| ENTRIES.get(i));
    }

    let needle = query.to_lowercase();
    ENTRIES
        .iter()
        .find(|e| e.question.to_lowercase() == needle)
        .or_else(|| ENTRIES.iter().find(|e| e.question.to_lowercase().contains(&needle)))
}

/// Resolved follow-up entries, skipping ids that are not in the catalog
pub fn follow_ups(entry: &Entry) -> Vec<&'static Entry> {
    entry.follow_ups.iter().filter_map(|id| by_id(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = entries().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), entries().len());
    }

    #[test]
    fn test_follow_ups_resolve() {
        for entry in entries() {
            assert_eq!(follow_ups(entry).len(), entry.follow_ups.len(), "{}", entry.id);
            assert!(!entry.follow_ups.contains(&entry.id));
        }
    }

    #[test]
    fn test_every_topic_is_covered() {
        for topic in [Topic::Sales, Topic::Payments, Topic::Marketing, Topic::Logistics] {
            assert!(entries().iter().any(|e| e.topic == topic), "{}", topic.label());
        }
    }

    #[test]
    fn test_charts_have_one_value_per_label() {
        for entry in entries() {
            if let Visual::BarChart { labels, values, .. } = entry.visual {
                assert_eq!(labels.len(), values.len(), "{}", entry.id);
            }
            if let Visual::Table { headers, rows } = entry.visual {
                assert!(rows.iter().all(|r| r.len() == headers.len()), "{}", entry.id);
            }
        }
    }

    #[test]
    fn test_conversion_rate_matches_funnel() {
        let funnel = by_id("funnel").unwrap();
        let Visual::BarChart { values, .. } = funnel.visual else {
            panic!("funnel should be a chart");
        };
        let rate = values[3] as f64 / values[0] as f64 * 100.0;
        assert_eq!(by_id("conversion-rate").unwrap().visual, Visual::Value("20.00%"));
        assert_eq!(format!("{:.2}%", rate), "20.00%");
    }

    #[test]
    fn test_find_by_id_index_and_text() {
        assert_eq!(find("roas").unwrap().id, "roas");
        assert_eq!(find("ROAS").unwrap().id, "roas");
        assert_eq!(find("1").unwrap().id, "funnel");
        assert_eq!(find("What is my SR?").unwrap().id, "sr");
        assert_eq!(find("failed transactions").unwrap().id, "failed-transactions");
        assert!(find("0").is_none());
        assert!(find("99").is_none());
        assert!(find("   ").is_none());
        assert!(find("weather").is_none());
    }
}
