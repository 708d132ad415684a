/// Instruction sent to the text model to turn a short idea into a detailed
/// food photography prompt.
pub fn enhancement_instruction(user_prompt: &str) -> String {
    format!(
        "You are a prompt engineering assistant specialized in restaurant and food imagery. \
Improve the following short prompt into a detailed, vivid, composition-rich text-to-image prompt \
for restaurant use. Add professional food photography details: lighting (natural, warm, ambient), \
camera angle (overhead, side, close-up), food styling, plate presentation, background ambiance, \
colors, textures, and mood. Focus on making it appetizing and restaurant-quality. Keep it to one \
paragraph. Return ONLY the enhanced prompt, no explanations.\n\n\
Original prompt: \"{}\"\n\n\
Enhanced prompt:",
        user_prompt
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_embeds_prompt() {
        let instruction = enhancement_instruction("ramen");
        assert!(instruction.contains("Original prompt: \"ramen\""));
        assert!(instruction.ends_with("Enhanced prompt:"));
        assert!(instruction.contains("Return ONLY the enhanced prompt"));
    }
}
