use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{info, instrument, warn};

use crate::contract::model::{NewReservation, Reservation};
use crate::domain::error::DomainError;
use crate::domain::ports::{CollectionPort, Notifier};

pub const MIN_GUESTS: u8 = 1;
pub const MAX_GUESTS: u8 = 20;
pub const DEFAULT_GUESTS: u8 = 2;

/// Table booking form. Date and time stay `None` until picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub guests: u8,
    pub special_requests: String,
}

impl Default for ReservationForm {
    fn default() -> Self {
        Self {
            customer_name: String::new(),
            customer_phone: String::new(),
            customer_email: String::new(),
            date: None,
            time: None,
            guests: DEFAULT_GUESTS,
            special_requests: String::new(),
        }
    }
}

impl ReservationForm {
    /// Validate against `today` and build the insert body.
    pub fn to_draft(&self, today: NaiveDate) -> Result<NewReservation, DomainError> {
        let name = self.customer_name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("customer_name", "is required"));
        }
        let phone = self.customer_phone.trim();
        if phone.is_empty() {
            return Err(DomainError::validation("customer_phone", "is required"));
        }
        let email = self.customer_email.trim();
        if !email.is_empty() && !email.contains('@') {
            return Err(DomainError::validation(
                "customer_email",
                format!("'{email}' is not an email address"),
            ));
        }
        let date = self
            .date
            .ok_or_else(|| DomainError::validation("reservation_date", "is required"))?;
        if date < today {
            return Err(DomainError::validation(
                "reservation_date",
                format!("{date} is in the past"),
            ));
        }
        let time = self
            .time
            .ok_or_else(|| DomainError::validation("reservation_time", "is required"))?;
        if !(MIN_GUESTS..=MAX_GUESTS).contains(&self.guests) {
            return Err(DomainError::validation(
                "number_of_guests",
                format!("must be between {MIN_GUESTS} and {MAX_GUESTS}"),
            ));
        }

        Ok(NewReservation {
            customer_name: name.to_string(),
            customer_phone: phone.to_string(),
            customer_email: (!email.is_empty()).then(|| email.to_string()),
            reservation_date: date,
            reservation_time: time,
            number_of_guests: self.guests,
            special_requests: self.special_requests.trim().to_string(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone)]
pub struct ReservationSubmission {
    reservations: Arc<dyn CollectionPort<Reservation>>,
    notifier: Arc<dyn Notifier>,
}

impl ReservationSubmission {
    pub fn new(
        reservations: Arc<dyn CollectionPort<Reservation>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            reservations,
            notifier,
        }
    }

    /// Book a table. The form is reset only when the backend accepted the booking.
    #[instrument(name = "feast.reservation.submit", skip_all, fields(guests = form.guests))]
    pub async fn submit(
        &self,
        form: &mut ReservationForm,
        today: NaiveDate,
    ) -> Result<Option<Reservation>, DomainError> {
        let draft = match form.to_draft(today) {
            Ok(draft) => draft,
            Err(e) => {
                self.notifier.error(e.to_string());
                return Err(e);
            }
        };

        match self.reservations.create(&draft).await {
            Ok(created) => {
                info!(date = %draft.reservation_date, "reservation submitted");
                form.reset();
                self.notifier.success(format!(
                    "Table for {} booked on {} at {}",
                    draft.number_of_guests,
                    draft.reservation_date,
                    draft.reservation_time.format("%H:%M")
                ));
                Ok(created)
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "reservation failed");
                self.notifier
                    .error("Could not book the table, please try again".to_string());
                Err(DomainError::from_infra(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ReservationForm {
        ReservationForm {
            customer_name: "Yacine".into(),
            customer_phone: "0555 12 34 56".into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2),
            time: NaiveTime::from_hms_opt(20, 0, 0),
            ..Default::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn default_party_is_two() {
        let draft = filled().to_draft(today()).unwrap();
        assert_eq!(draft.number_of_guests, 2);
        assert_eq!(draft.customer_email, None);
    }

    #[test]
    fn past_dates_are_rejected() {
        let form = ReservationForm {
            date: NaiveDate::from_ymd_opt(2025, 5, 31),
            ..filled()
        };
        let err = form.to_draft(today()).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "reservation_date"));
    }

    #[test]
    fn guest_count_is_bounded() {
        for guests in [0, 21] {
            let form = ReservationForm { guests, ..filled() };
            assert!(form.to_draft(today()).is_err(), "{guests} guests accepted");
        }
        let form = ReservationForm {
            guests: 20,
            ..filled()
        };
        assert!(form.to_draft(today()).is_ok());
    }

    #[test]
    fn booking_today_is_allowed() {
        let form = ReservationForm {
            date: Some(today()),
            ..filled()
        };
        assert!(form.to_draft(today()).is_ok());
    }
}
