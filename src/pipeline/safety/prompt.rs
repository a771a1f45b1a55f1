use crate::models::PatientProfile;
use crate::pipeline::recommendation::SelectedExercise;

/// User message for the verification call: the profile and the proposed
/// exercises only. Targets and the capability summary are left out so the
/// reviewer judges the exercises on the patient data alone.
pub fn build_verification_message(
    profile: &PatientProfile,
    selected: &[SelectedExercise],
) -> Result<String, serde_json::Error> {
    let profile_json = serde_json::to_string_pretty(profile)?;
    let selected_json = serde_json::to_string_pretty(selected)?;
    Ok(format!(
        "PATIENT DATA:\n\n{profile_json}\n\n\
         PROPOSED EXERCISES:\n\n{selected_json}\n\n\
         Review each proposed exercise for safety using the constraint checks. Remember to use \
         the flexible \"soft start\" approach for core stability assessment."
    ))
}
