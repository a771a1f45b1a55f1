use crate::models::PatientProfile;

/// User message for the recommendation call: the full profile as JSON.
pub fn build_recommendation_message(profile: &PatientProfile) -> Result<String, serde_json::Error> {
    let profile_json = serde_json::to_string_pretty(profile)?;
    Ok(format!(
        "PATIENT DATA:\n\n{profile_json}\n\n\
         Analyze this patient and recommend 4 exercises based on their capability and \
         biomechanical needs."
    ))
}
