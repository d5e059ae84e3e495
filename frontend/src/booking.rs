//! Parcours de réservation : visite choisie → guide éventuel → envoi.
//!
//! Le brouillon voyage dans l'état de navigation (jamais dans le stockage).
//! Les transitions sont pures ; l'écran exécute les `FlowEffect` renvoyés.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{ReservationPayload, Visit};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitType {
    Libre,
    Guide,
}

impl VisitType {
    pub fn from_select(value: &str) -> Option<Self> {
        match value {
            "libre" => Some(VisitType::Libre),
            "guide" => Some(VisitType::Guide),
            _ => None,
        }
    }

    pub const fn value(self) -> &'static str {
        match self {
            VisitType::Libre => "libre",
            VisitType::Guide => "guide",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BookingDraft {
    pub visit: Option<Visit>,
    pub guide_id: Option<i64>,
    pub visit_type: Option<VisitType>,
    /// Saisies brutes du formulaire, validées à l'envoi.
    pub date: String,
    pub duration: String,
}

impl BookingDraft {
    pub fn from_visit(visit: Visit) -> Self {
        Self { visit: Some(visit), ..Self::default() }
    }

    pub fn visit_id(&self) -> Option<i64> {
        self.visit.as_ref().map(|v| v.id_visite)
    }

    pub fn with_guide(mut self, guide_id: i64) -> Self {
        self.guide_id = Some(guide_id);
        self.visit_type = Some(VisitType::Guide);
        self
    }

    fn is_guided(&self) -> bool {
        self.visit_type == Some(VisitType::Guide)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Veuillez sélectionner une visite.")]
    MissingVisit,
    #[error("Utilisateur non connecté.")]
    MissingTourist,
    #[error("Tous les champs sont requis.")]
    MissingFields,
    #[error("La date doit être au format AAAA-MM-JJ.")]
    BadDate,
    #[error("La durée doit être un nombre de jours positif.")]
    BadDuration,
    #[error("Un guide est requis pour une visite guidée.")]
    MissingGuide,
}

/// Contrôle complet avant tout appel réseau.
pub fn validate(draft: &BookingDraft, tourist_id: Option<i64>) -> Result<ReservationPayload, DraftError> {
    let id_visite = draft.visit_id().ok_or(DraftError::MissingVisit)?;
    let id_touriste = tourist_id.ok_or(DraftError::MissingTourist)?;

    let (date, duration) = (draft.date.trim(), draft.duration.trim());
    if date.is_empty() || duration.is_empty() {
        return Err(DraftError::MissingFields);
    }
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| DraftError::BadDate)?;
    let duree = duration
        .parse::<u32>()
        .ok()
        .filter(|d| *d > 0)
        .ok_or(DraftError::BadDuration)?;

    let id_guide = if draft.is_guided() {
        Some(draft.guide_id.ok_or(DraftError::MissingGuide)?)
    } else {
        None
    };

    Ok(ReservationPayload {
        date_activite: date.format("%Y-%m-%d").to_string(),
        duree,
        id_visite,
        id_touriste,
        id_guide,
    })
}

/* -------------------------------------------------------------------------- */
/*                              machine d'états                               */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Debug, PartialEq)]
pub enum BookingStage {
    VisitSelected,
    AwaitingGuideChoice,
    ReadyToSubmit,
    Submitting,
    Submitted,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum BookingEvent {
    VisitTypeChosen(Option<VisitType>),
    DateEntered(String),
    DurationEntered(String),
    GuideAttached(i64),
    SubmitRequested,
    SubmitSucceeded,
    SubmitFailed(String),
    /// 401 pendant l'envoi : le jeton est déjà purgé.
    SessionExpired(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlowEffect {
    /// Aller à la liste des guides en emportant le brouillon.
    ChooseGuide(BookingDraft),
    Submit(ReservationPayload),
    /// Réservation acceptée : écran de confirmation.
    Confirm,
    /// Retour à la connexion, le brouillon est conservé pour revenir ensuite.
    Relogin(BookingDraft),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("Utilisateur non connecté.")]
    NeedsLogin,
    #[error("Veuillez sélectionner une visite.")]
    NoVisit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BookingFlow {
    tourist_id: i64,
    draft: BookingDraft,
    stage: BookingStage,
}

impl BookingFlow {
    /// Entrée sur le formulaire. Un brouillon qui revient de la liste des
    /// guides porte déjà `guide_id` : aucune nouvelle redirection n'a lieu.
    pub fn enter(
        draft: Option<BookingDraft>,
        tourist_id: Option<i64>,
    ) -> Result<(Self, Option<FlowEffect>), EntryError> {
        let tourist_id = tourist_id.ok_or(EntryError::NeedsLogin)?;
        let mut draft = draft.filter(|d| d.visit.is_some()).ok_or(EntryError::NoVisit)?;
        if draft.guide_id.is_some() {
            draft.visit_type = Some(VisitType::Guide);
        }

        let mut flow = Self { tourist_id, draft, stage: BookingStage::VisitSelected };
        flow.settle();
        let effect = (flow.stage == BookingStage::AwaitingGuideChoice).then(|| FlowEffect::ChooseGuide(flow.draft.clone()));
        Ok((flow, effect))
    }

    pub fn stage(&self) -> &BookingStage {
        &self.stage
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn tourist_id(&self) -> i64 {
        self.tourist_id
    }

    pub fn is_busy(&self) -> bool {
        self.stage == BookingStage::Submitting
    }

    pub fn error(&self) -> Option<&str> {
        match &self.stage {
            BookingStage::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    fn settle(&mut self) {
        self.stage = if self.draft.is_guided() && self.draft.guide_id.is_none() {
            BookingStage::AwaitingGuideChoice
        } else if validate(&self.draft, Some(self.tourist_id)).is_ok() {
            BookingStage::ReadyToSubmit
        } else {
            BookingStage::VisitSelected
        };
    }

    fn await_guide(&mut self) -> Option<FlowEffect> {
        self.stage = BookingStage::AwaitingGuideChoice;
        Some(FlowEffect::ChooseGuide(self.draft.clone()))
    }

    pub fn apply(&mut self, event: BookingEvent) -> Option<FlowEffect> {
        use BookingEvent as E;
        use BookingStage as S;

        match (&self.stage, event) {
            // brouillon consommé, ou envoi déjà en cours
            (S::Submitted, _) => None,
            (S::Submitting, E::SubmitSucceeded) => {
                self.stage = S::Submitted;
                self.draft = BookingDraft::default();
                Some(FlowEffect::Confirm)
            }
            (S::Submitting, E::SubmitFailed(message)) => {
                self.stage = S::Failed(message);
                None
            }
            (S::Submitting, E::SessionExpired(message)) => {
                self.stage = S::Failed(message);
                Some(FlowEffect::Relogin(self.draft.clone()))
            }
            (S::Submitting, _) => None,
            (_, E::SubmitSucceeded | E::SubmitFailed(_) | E::SessionExpired(_)) => None,

            (_, E::VisitTypeChosen(kind)) => {
                self.draft.visit_type = kind;
                if self.draft.is_guided() && self.draft.guide_id.is_none() {
                    return self.await_guide();
                }
                self.settle();
                None
            }
            (_, E::DateEntered(date)) => {
                self.draft.date = date;
                self.settle();
                None
            }
            (_, E::DurationEntered(duration)) => {
                self.draft.duration = duration;
                self.settle();
                None
            }
            (_, E::GuideAttached(id)) => {
                self.draft = std::mem::take(&mut self.draft).with_guide(id);
                self.settle();
                None
            }
            (_, E::SubmitRequested) => match validate(&self.draft, Some(self.tourist_id)) {
                Ok(payload) => {
                    self.stage = S::Submitting;
                    Some(FlowEffect::Submit(payload))
                }
                Err(DraftError::MissingGuide) => self.await_guide(),
                Err(e) => {
                    self.stage = S::Failed(e.to_string());
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(id: i64) -> Visit {
        Visit {
            id_visite: id,
            pays: "Madagascar".into(),
            ville: "Nosy Be".into(),
            kind: "plage".into(),
            description: String::new(),
            image: None,
        }
    }

    fn filled(mut draft: BookingDraft) -> BookingDraft {
        draft.date = "2026-12-01".into();
        draft.duration = "3".into();
        draft
    }

    fn flow(draft: BookingDraft) -> BookingFlow {
        let (flow, effect) = BookingFlow::enter(Some(draft), Some(7)).unwrap();
        assert_eq!(effect, None);
        flow
    }

    #[test]
    fn entry_requires_a_tourist_then_a_visit() {
        assert_eq!(BookingFlow::enter(Some(BookingDraft::from_visit(visit(5))), None), Err(EntryError::NeedsLogin));
        assert_eq!(BookingFlow::enter(None, Some(7)), Err(EntryError::NoVisit));
        assert_eq!(BookingFlow::enter(Some(BookingDraft::default()), Some(7)), Err(EntryError::NoVisit));
    }

    #[test]
    fn every_missing_field_is_rejected_before_the_network() {
        let complete = filled(BookingDraft::from_visit(visit(5)));
        assert!(validate(&complete, Some(7)).is_ok());

        assert_eq!(validate(&BookingDraft { visit: None, ..complete.clone() }, Some(7)), Err(DraftError::MissingVisit));
        assert_eq!(validate(&complete, None), Err(DraftError::MissingTourist));
        assert_eq!(validate(&BookingDraft { date: " ".into(), ..complete.clone() }, Some(7)), Err(DraftError::MissingFields));
        assert_eq!(validate(&BookingDraft { duration: String::new(), ..complete.clone() }, Some(7)), Err(DraftError::MissingFields));
        assert_eq!(
            validate(&BookingDraft { visit_type: Some(VisitType::Guide), ..complete.clone() }, Some(7)),
            Err(DraftError::MissingGuide)
        );
    }

    #[test]
    fn malformed_inputs_are_reported() {
        let complete = filled(BookingDraft::from_visit(visit(5)));
        assert_eq!(validate(&BookingDraft { date: "01/12/2026".into(), ..complete.clone() }, Some(7)), Err(DraftError::BadDate));
        assert_eq!(validate(&BookingDraft { duration: "0".into(), ..complete.clone() }, Some(7)), Err(DraftError::BadDuration));
        assert_eq!(validate(&BookingDraft { duration: "2.5".into(), ..complete }, Some(7)), Err(DraftError::BadDuration));
    }

    #[test]
    fn free_visit_payload_has_no_guide() {
        let mut draft = filled(BookingDraft::from_visit(visit(5))).with_guide(4);
        draft.visit_type = Some(VisitType::Libre);
        let payload = validate(&draft, Some(7)).unwrap();
        assert_eq!(payload.id_guide, None);
        assert_eq!(payload.duree, 3);
    }

    #[test]
    fn choosing_guided_visit_without_guide_goes_to_guide_listing() {
        let mut flow = flow(BookingDraft::from_visit(visit(5)));
        assert_eq!(flow.stage(), &BookingStage::VisitSelected);

        let effect = flow.apply(BookingEvent::VisitTypeChosen(Some(VisitType::Guide)));
        assert_eq!(flow.stage(), &BookingStage::AwaitingGuideChoice);
        match effect {
            Some(FlowEffect::ChooseGuide(draft)) => assert_eq!(draft.visit_id(), Some(5)),
            other => panic!("redirection attendue, obtenu {other:?}"),
        }
    }

    #[test]
    fn submit_with_guided_visit_and_no_guide_redirects_with_ids_intact() {
        let mut draft = filled(BookingDraft::from_visit(visit(5)));
        draft.visit_type = Some(VisitType::Guide);
        let (mut flow, entry_effect) = BookingFlow::enter(Some(draft), Some(7)).unwrap();
        assert!(matches!(entry_effect, Some(FlowEffect::ChooseGuide(_))));

        let effect = flow.apply(BookingEvent::SubmitRequested);
        assert!(matches!(&effect, Some(FlowEffect::ChooseGuide(d)) if d.visit_id() == Some(5)));
        assert_eq!(flow.tourist_id(), 7);
        assert!(!flow.is_busy());
    }

    #[test]
    fn returning_from_guide_listing_does_not_redirect_again() {
        let from_guides = filled(BookingDraft::from_visit(visit(5))).with_guide(4);
        let (mut flow, effect) = BookingFlow::enter(Some(from_guides), Some(7)).unwrap();

        assert_eq!(effect, None);
        assert_eq!(flow.stage(), &BookingStage::ReadyToSubmit);
        assert_eq!(flow.apply(BookingEvent::VisitTypeChosen(Some(VisitType::Guide))), None);
        assert_eq!(flow.stage(), &BookingStage::ReadyToSubmit);
    }

    #[test]
    fn guide_attached_in_place_completes_the_draft() {
        let mut flow = flow(filled(BookingDraft::from_visit(visit(5))));
        flow.apply(BookingEvent::VisitTypeChosen(Some(VisitType::Guide)));
        assert_eq!(flow.apply(BookingEvent::GuideAttached(4)), None);
        assert_eq!(flow.stage(), &BookingStage::ReadyToSubmit);
        assert_eq!(flow.draft().guide_id, Some(4));
    }

    #[test]
    fn successful_submission_discards_the_draft() {
        let mut flow = flow(BookingDraft::from_visit(visit(5)));
        flow.apply(BookingEvent::DateEntered("2026-12-01".into()));
        flow.apply(BookingEvent::DurationEntered("2".into()));
        assert_eq!(flow.stage(), &BookingStage::ReadyToSubmit);

        let payload = match flow.apply(BookingEvent::SubmitRequested) {
            Some(FlowEffect::Submit(p)) => p,
            other => panic!("envoi attendu, obtenu {other:?}"),
        };
        assert_eq!((payload.id_visite, payload.id_touriste, payload.duree), (5, 7, 2));
        assert!(flow.is_busy());

        // double clic pendant l'envoi
        assert_eq!(flow.apply(BookingEvent::SubmitRequested), None);

        assert_eq!(flow.apply(BookingEvent::SubmitSucceeded), Some(FlowEffect::Confirm));
        assert_eq!(flow.stage(), &BookingStage::Submitted);
        assert_eq!(flow.draft(), &BookingDraft::default());
        assert_eq!(flow.apply(BookingEvent::SubmitRequested), None);
    }

    #[test]
    fn failed_submission_keeps_the_draft_for_a_manual_retry() {
        let mut flow = flow(filled(BookingDraft::from_visit(visit(5))));
        flow.apply(BookingEvent::SubmitRequested);
        assert_eq!(flow.apply(BookingEvent::SubmitFailed("Créneau complet".into())), None);

        assert_eq!(flow.error(), Some("Créneau complet"));
        assert_eq!(flow.draft().visit_id(), Some(5));
        assert!(matches!(flow.apply(BookingEvent::SubmitRequested), Some(FlowEffect::Submit(_))));
    }

    #[test]
    fn expired_session_during_submission_sends_back_to_login_with_the_draft() {
        let mut flow = flow(filled(BookingDraft::from_visit(visit(5))).with_guide(4));
        assert!(matches!(flow.apply(BookingEvent::SubmitRequested), Some(FlowEffect::Submit(_))));

        let effect = flow.apply(BookingEvent::SessionExpired("Votre session a expiré.".into()));
        match effect {
            Some(FlowEffect::Relogin(draft)) => {
                assert_eq!(draft.visit_id(), Some(5));
                assert_eq!(draft.guide_id, Some(4));
                assert_eq!(draft.date, "2026-12-01");
            }
            other => panic!("retour à la connexion attendu, obtenu {other:?}"),
        }
        assert_eq!(flow.error(), Some("Votre session a expiré."));
        assert!(!flow.is_busy());
    }

    #[test]
    fn late_expiry_outside_submission_is_ignored() {
        let mut flow = flow(filled(BookingDraft::from_visit(visit(5))));
        assert_eq!(flow.apply(BookingEvent::SessionExpired("x".into())), None);
        assert_eq!(flow.stage(), &BookingStage::ReadyToSubmit);
    }

    #[test]
    fn client_side_rejection_shows_inline_error_without_effect() {
        let mut flow = flow(BookingDraft::from_visit(visit(5)));
        assert_eq!(flow.apply(BookingEvent::SubmitRequested), None);
        assert_eq!(flow.error(), Some("Tous les champs sont requis."));

        flow.apply(BookingEvent::DateEntered("2026-12-01".into()));
        assert_eq!(flow.error(), None);
    }

    #[test]
    fn stale_results_are_ignored() {
        let mut flow = flow(filled(BookingDraft::from_visit(visit(5))));
        assert_eq!(flow.apply(BookingEvent::SubmitSucceeded), None);
        assert_eq!(flow.stage(), &BookingStage::ReadyToSubmit);
    }
}
