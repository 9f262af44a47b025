use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::structs::{
    HomePayload, NewHome, NewParticipant, NewWork, ParticipantPayload, WorkPayload,
};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex");
    static ref DOB_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("dob regex");
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Accepts only `YYYY-MM-DD` strings naming a real calendar date. The
/// format-back comparison rejects inputs a lenient parser would coerce,
/// e.g. `2023-02-30`.
fn is_valid_dob(dob: &str) -> bool {
    if !DOB_RE.is_match(dob) {
        return false;
    }
    NaiveDate::parse_from_str(dob, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string() == dob)
        .unwrap_or(false)
}

/// Checks an inbound participant payload and either returns the fully
/// concrete record or every violation found, so the caller can fix all of
/// them in one round trip.
pub fn validate_participant(payload: &ParticipantPayload) -> Result<NewParticipant, Vec<String>> {
    let mut errors = Vec::new();

    let email = match payload.email.as_deref() {
        Some(email) if is_valid_email(email) => Some(email.to_string()),
        _ => {
            errors.push("Invalid or missing email address".to_string());
            None
        }
    };
    let firstname = match payload.firstname.as_deref() {
        Some(name) if !name.trim().is_empty() => Some(name.to_string()),
        _ => {
            errors.push("Invalid or missing first name".to_string());
            None
        }
    };
    let lastname = match payload.lastname.as_deref() {
        Some(name) if !name.trim().is_empty() => Some(name.to_string()),
        _ => {
            errors.push("Invalid or missing last name".to_string());
            None
        }
    };
    let dob = match payload.dob.as_deref() {
        Some(dob) if is_valid_dob(dob) => Some(dob.to_string()),
        _ => {
            errors.push("Invalid or missing date of birth (format: YYYY-MM-DD)".to_string());
            None
        }
    };

    let work = match payload.work.as_ref() {
        Some(work) => validate_work(work, &mut errors),
        None => {
            errors.push("Missing work details".to_string());
            None
        }
    };
    let home = match payload.home.as_ref() {
        Some(home) => validate_home(home, &mut errors),
        None => {
            errors.push("Missing home details".to_string());
            None
        }
    };

    match (email, firstname, lastname, dob, work, home) {
        (Some(email), Some(firstname), Some(lastname), Some(dob), Some(work), Some(home))
            if errors.is_empty() =>
        {
            Ok(NewParticipant {
                email,
                firstname,
                lastname,
                dob,
                work,
                home,
            })
        }
        _ => Err(errors),
    }
}

fn validate_work(work: &WorkPayload, errors: &mut Vec<String>) -> Option<NewWork> {
    if work.companyname.is_none() {
        errors.push("Invalid or missing company name".to_string());
    }
    if work.salary.is_none() {
        errors.push("Invalid or missing salary".to_string());
    }
    if work.currency.is_none() {
        errors.push("Invalid or missing currency".to_string());
    }
    Some(NewWork {
        companyname: work.companyname.clone()?,
        salary: work.salary?,
        currency: work.currency.clone()?,
    })
}

fn validate_home(home: &HomePayload, errors: &mut Vec<String>) -> Option<NewHome> {
    if home.country.is_none() {
        errors.push("Invalid or missing country".to_string());
    }
    if home.city.is_none() {
        errors.push("Invalid or missing city".to_string());
    }
    Some(NewHome {
        country: home.country.clone()?,
        city: home.city.clone()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> ParticipantPayload {
        ParticipantPayload {
            email: Some("a@b.com".to_string()),
            firstname: Some("A".to_string()),
            lastname: Some("B".to_string()),
            dob: Some("1990-01-01".to_string()),
            work: Some(WorkPayload {
                companyname: Some("X".to_string()),
                salary: Some(1000.0),
                currency: Some("USD".to_string()),
            }),
            home: Some(HomePayload {
                country: Some("US".to_string()),
                city: Some("NYC".to_string()),
            }),
        }
    }

    #[test]
    fn full_payload_passes() {
        let record = validate_participant(&full_payload()).unwrap();
        assert_eq!(record.email, "a@b.com");
        assert_eq!(record.dob, "1990-01-01");
        assert_eq!(record.work.salary, 1000.0);
        assert_eq!(record.home.city, "NYC");
    }

    #[test]
    fn missing_dob_is_reported() {
        let mut payload = full_payload();
        payload.dob = None;
        let errors = validate_participant(&payload).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("date of birth"));
    }

    #[test]
    fn impossible_calendar_date_is_rejected() {
        let mut payload = full_payload();
        payload.dob = Some("2023-02-30".to_string());
        let errors = validate_participant(&payload).unwrap_err();
        assert!(errors[0].contains("date of birth"));
    }

    #[test]
    fn unpadded_date_is_rejected() {
        let mut payload = full_payload();
        payload.dob = Some("1990-1-1".to_string());
        assert!(validate_participant(&payload).is_err());
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        let mut payload = full_payload();
        payload.email = Some("a@b".to_string());
        let errors = validate_participant(&payload).unwrap_err();
        assert!(errors[0].contains("email"));
    }

    #[test]
    fn whitespace_name_is_rejected() {
        let mut payload = full_payload();
        payload.firstname = Some("   ".to_string());
        let errors = validate_participant(&payload).unwrap_err();
        assert!(errors[0].contains("first name"));
    }

    #[test]
    fn empty_payload_reports_every_violation() {
        let payload = ParticipantPayload {
            email: None,
            firstname: None,
            lastname: None,
            dob: None,
            work: None,
            home: None,
        };
        let errors = validate_participant(&payload).unwrap_err();
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn partial_work_details_report_each_field() {
        let mut payload = full_payload();
        payload.work = Some(WorkPayload {
            companyname: None,
            salary: None,
            currency: Some("USD".to_string()),
        });
        let errors = validate_participant(&payload).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("company name")));
        assert!(errors.iter().any(|e| e.contains("salary")));
        assert!(!errors.iter().any(|e| e.contains("currency")));
    }
}
