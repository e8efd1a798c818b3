//! Renders listings into the plain-text context block handed to the model.

use crate::models::job::JobListing;

/// Line closing every listing block.
pub const BLOCK_SEPARATOR: &str = "-------------------";

/// Renders every listing, in input order, as one fixed-shape block.
/// Blocks are separated by a blank line. Pure and deterministic.
pub fn render(listings: &[JobListing]) -> String {
    listings
        .iter()
        .map(render_one)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_one(job: &JobListing) -> String {
    format!(
        "Job Title: {}\nCompany: {}\nLocation: {}\nSalary: {}\nApply Here: {}\n{}\n",
        job.title.as_deref().unwrap_or_default(),
        job.company.as_deref().unwrap_or_default(),
        job.location_text(),
        job.salary_text(),
        job.link.as_deref().unwrap_or_default(),
        BLOCK_SEPARATOR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{Location, Salary, NOT_SPECIFIED};

    fn listing(title: &str, location: Location, salary: Option<Salary>) -> JobListing {
        JobListing {
            title: Some(title.to_string()),
            company: Some("Outpace".to_string()),
            location: Some(location),
            salary,
            link: Some(format!("https://jobs.example/{title}")),
        }
    }

    #[test]
    fn test_empty_input_renders_empty_string() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn test_single_block_exact_shape() {
        let job = listing(
            "Rust Developer",
            Location::One("Gurgaon".to_string()),
            Some(Salary::Integer(1_500_000)),
        );
        assert_eq!(
            render(&[job]),
            "Job Title: Rust Developer\n\
             Company: Outpace\n\
             Location: Gurgaon\n\
             Salary: 1500000\n\
             Apply Here: https://jobs.example/Rust Developer\n\
             -------------------\n"
        );
    }

    #[test]
    fn test_preserves_order_one_block_per_listing() {
        let jobs = vec![
            listing("Zeta", Location::One("Pune".to_string()), None),
            listing("Alpha", Location::One("Delhi".to_string()), None),
            listing("Mid", Location::One("Noida".to_string()), None),
        ];
        let out = render(&jobs);

        assert_eq!(out.matches(BLOCK_SEPARATOR).count(), 3);
        let zeta = out.find("Job Title: Zeta").unwrap();
        let alpha = out.find("Job Title: Alpha").unwrap();
        let mid = out.find("Job Title: Mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
        for field in ["Job Title:", "Company:", "Location:", "Salary:", "Apply Here:"] {
            assert_eq!(out.matches(field).count(), 3, "{field}");
        }
    }

    #[test]
    fn test_multiple_locations_joined_consistently() {
        let job = listing(
            "Analyst",
            Location::Many(vec![
                "Gurgaon".to_string(),
                "Mumbai".to_string(),
                "Hyderabad".to_string(),
            ]),
            None,
        );
        assert!(render(&[job]).contains("Location: Gurgaon, Mumbai, Hyderabad\n"));
    }

    #[test]
    fn test_single_location_has_no_separator_artifacts() {
        let one = listing("A", Location::One("Gurgaon".to_string()), None);
        let list_of_one = listing("B", Location::Many(vec!["Gurgaon".to_string()]), None);
        for job in [one, list_of_one] {
            let out = render(&[job]);
            assert!(out.contains("Location: Gurgaon\n"));
            assert!(!out.contains("Gurgaon,"));
        }
    }

    #[test]
    fn test_absent_salary_is_explicit() {
        let out = render(&[listing("A", Location::One("Pune".to_string()), None)]);
        assert!(out.contains(&format!("Salary: {NOT_SPECIFIED}\n")));
    }

    #[test]
    fn test_render_is_deterministic() {
        let jobs = vec![
            listing("A", Location::One("Pune".to_string()), Some(Salary::Text("10 LPA".into()))),
            listing("B", Location::Many(vec!["X".into(), "Y".into()]), None),
        ];
        assert_eq!(render(&jobs), render(&jobs));
    }
}
