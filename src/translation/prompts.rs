//! 提交给文本生成服务的指令模板

/// 系统指令：逐条翻译展平后的商品数据
pub const TRANSLATE_SYSTEM: &str = r#"Translate flattened product data from a Chinese e-commerce platform into English, maintaining the original structure and format.

# Task
You will receive a list of path-text pairs. Each pair consists of:
1. A "path" indicating the location of the data in the original structure
2. A "text" containing the Chinese content that needs to be translated

# CRITICAL REQUIREMENT
YOU MUST RETURN EXACTLY ONE TRANSLATION ITEM FOR EACH INPUT ITEM, even if you decide not to translate it. The length of your "translations" array MUST EXACTLY MATCH the length of the input array. Do not skip any items.

# Guidelines
- Analyze each text value to determine if it should be translated
- Use appropriate product terminology in your translations
- Maintain the original meaning while making the translation natural in English
- If a text contains both Chinese and non-Chinese parts, only translate the Chinese parts

# Rules for Determining What Should NOT Be Translated
- URLs, links, image paths, or any web addresses (e.g., "https://", "www.")
- Pure product codes or SKUs without Chinese words (e.g., "A123B456C")
- Pure numeric values (e.g., "220V", "5V 2A")
- Currency values (e.g., "¥31.80", "USD 25")
- Email addresses
- Any text that consists solely of numbers, symbols, or Latin characters

# Special Translation Rules
- For product codes with Chinese characters or units (e.g., "K36-0.8米-黑"), translate only the Chinese words and units to their English equivalents (e.g., "K36-0.8m-Black") while preserving the code structure
- Preserve all numbers, dashes, and other formatting characters in the original position
- For measurements, convert Chinese units to appropriate English units (e.g., "米" → "m", "厘米" → "cm")

# Response Format
Return a JSON object with a "translations" array containing EXACTLY ONE ITEM FOR EACH INPUT ITEM. For every input item, include:
1. The original "path"
2. The "original_text"
3. A boolean "should_translate" flag indicating if the text needs translation
4. The "translated_text" (null when should_translate is false)

Example output:
{
  "translations": [
    {
      "path": "product_title_main",
      "original_text": "多功能无线充电插座带USB快充插线板家用宿舍创意插排",
      "should_translate": true,
      "translated_text": "Multifunctional Wireless Charging Socket with USB Fast Charging Power Strip"
    },
    {
      "path": "url",
      "original_text": "https://detail.1688.com/offer/764286652699.html",
      "should_translate": false,
      "translated_text": null
    },
    {
      "path": "spec_variants.values[0][1]",
      "original_text": "K36-0.8米-黑",
      "should_translate": true,
      "translated_text": "K36-0.8m-Black"
    }
  ]
}

# IMPORTANT NOTES
- Your output MUST include EVERY item from the input, regardless of whether you translate it or not
- The order of items in your output should match the order in the input
- If "should_translate" is false, set "translated_text" to null
- DO NOT skip any items, even if they don't need translation"#;

/// 渲染用户消息，`payload` 为批次项的 JSON 序列化结果
pub fn user_prompt(payload: &str) -> String {
    format!(
        "I need you to translate the following flattened product data from Chinese to English. \
         Follow the guidelines in the system prompt carefully.\n\n\
         CRITICAL: You MUST return ONE translation item for EACH input item, even if you decide \
         not to translate it. Your output must contain EXACTLY the same number of items as the input.\n\n\
         Product data to translate:\n```\n{payload}\n```\n\n\
         Return the translated data in the correct structured format, with ALL input items included \
         in your response."
    )
}
