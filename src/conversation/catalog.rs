//! Static texts: greeting, menu, canned intros and fixed notices
//!
//! All user-facing strings are Spanish. Control flow never depends on them.

use super::{ChatOption, Message, Topic};

/// Id of the synthetic greeting that seeds every conversation
pub const GREETING_MESSAGE_ID: &str = "init";

const GREETING_TEXT: &str =
    "¡Hola! Soy Autobot, tu asistente de mantenimiento preventivo. ¿En qué puedo ayudarte hoy?";

/// Reply used whenever the generation service fails or times out
pub const APOLOGY_TEXT: &str =
    "Lo siento, estoy teniendo problemas para conectarme. Por favor, inténtalo de nuevo más tarde.";

/// Appended when the inactivity watchdog fires
pub const INACTIVITY_NOTICE: &str = "Tu sesión se ha cerrado por inactividad. **Recarga la página** para comenzar una nueva conversación con Autobot.";

const TOPIC_LABELS: &[(Topic, &str)] = &[
    (Topic::Greeting, "Saludo"),
    (Topic::BasicCheck, "Revisión Básica del Motor"),
    (Topic::Reminders, "Mantenimiento del Motor"),
    (Topic::Alerts, "Señales de Alerta"),
    (Topic::Tips, "Tips de Cuidado"),
    (Topic::Custom, "Personalizar"),
];

/// Topics offered on the welcome menu, in display order
const MENU: [Topic; 4] = [Topic::BasicCheck, Topic::Reminders, Topic::Alerts, Topic::Tips];

pub fn topic_label(topic: Topic) -> &'static str {
    TOPIC_LABELS
        .iter()
        .find(|(t, _)| *t == topic)
        .map_or("", |(_, label)| label)
}

/// The main menu, used on the welcome view and re-offered after open questions
pub fn initial_options() -> Vec<ChatOption> {
    MENU.iter()
        .map(|&topic| ChatOption::new(topic_label(topic), topic))
        .collect()
}

pub fn greeting_message() -> Message {
    Message::bot(GREETING_MESSAGE_ID, GREETING_TEXT).with_options(initial_options())
}

/// Precomputed first reply for a topic, if it has one
pub fn canned_response(topic: Topic) -> Option<&'static str> {
    match topic {
        Topic::BasicCheck => Some(BASIC_CHECK_INTRO),
        Topic::Reminders => Some(REMINDERS_INTRO),
        Topic::Tips => Some(TIPS_INTRO),
        Topic::Alerts => Some(ALERTS_INTRO),
        Topic::Greeting | Topic::Custom => None,
    }
}

const BASIC_CHECK_INTRO: &str = r#"¡Excelente elección! La **"Revisión Básica del Motor"** es fundamental para la salud de tu vehículo.
Comencemos con el **aceite del motor**, que es la sangre de tu coche.

1. Asegúrate de que el vehículo esté en una **superficie plana** y el motor **apagado y frío** (al menos 15-20 minutos después de haberlo usado).
2. Localiza la **varilla medidora del aceite** (suele tener un mango de color brillante, como amarillo o naranja).
3. Sácala, límpiala con un paño o papel, e insértala de nuevo hasta el fondo.
4. Retírala nuevamente y observa el nivel del aceite.

**¿El nivel de aceite está entre las marcas de "Mín" y "Máx" en la varilla?**"#;

const REMINDERS_INTRO: &str = r"¡Un buen programa de **Mantenimiento del Motor** es vital! Aquí tienes un resumen de las tareas más importantes:

### ⚙️ Mantenimiento Esencial

1.  **Cambio de Aceite y Filtro:**
    * **Aceite Convencional/Mineral:** Cámbialo cada **5,000 km** o 6 meses.
    * **Aceite Semisintético:** Cámbialo cada **8,000 km** o 9 meses.
    * **Aceite Sintético:** Cámbialo cada **10,000 a 15,000 km** o 1 año.
    * *Sigue siempre las indicaciones exactas del manual de tu vehículo.*

2.  **Filtro de Aire del Motor:**
    * Generalmente se cambia cada **20,000 km** o 1 año. Un filtro limpio asegura un flujo de aire adecuado y una mejor eficiencia.

3.  **Revisión de Líquidos:**
    * Mensualmente, verifica el nivel de **refrigerante** (¡solo con motor frío!) y el **líquido de frenos**.

4.  **Revisión de Neumáticos:**
    * Revisa la presión de inflado semanalmente y realiza la **rotación de neumáticos** cada **10,000 km** para asegurar un desgaste uniforme.

¿Tienes alguna otra pregunta sobre el calendario de mantenimiento o deseas saber más detalles de alguna de estas revisiones?";

const TIPS_INTRO: &str = r"¡Buena Iniciativa! Los **Tips de Cuidado** 🛡️ son la clave para prolongar la vida útil de tu motor y mantener tu vehículo en excelente estado.

Aquí tienes 5 tips esenciales para comenzar:

1.  **🚗 Respeta los Tiempos de Calentamiento:** No aceleres bruscamente apenas enciendas el motor. Deja que el aceite circule y alcance la temperatura de operación óptima (unos 30-60 segundos es suficiente).
2.  **💧 Usa el Aceite Correcto:** Siempre utiliza el tipo de aceite (sintético, semisintético, y viscosidad) recomendado por el fabricante de tu vehículo. Esto reduce la fricción y el desgaste.
3.  **🧊 No Fuerces el Motor en Frío:** Evita llevar las RPM al límite hasta que el indicador de temperatura del motor haya alcanzado su nivel normal.
4.  **📈 Revisa tus Fluidos Regularmente:** Acostúmbrate a revisar el nivel de aceite, refrigerante y otros fluidos al menos una vez al mes. La falta de fluidos es una causa principal de fallas graves.
5.  **👂 Presta Atención a los Ruidos:** Cualquier ruido inusual (golpeteo, chillidos, silbidos) es una señal de que algo necesita atención. Ignorarlos puede convertir un problema menor en una reparación costosa.

¿Tienes alguna pregunta específica sobre alguno de estos tips o deseas más información sobre un aspecto particular del cuidado del motor?";

const ALERTS_INTRO: &str = r#"🚨 ¡ATENCIÓN! Si tu motor presenta alguna de estas señales, es crucial actuar de inmediato para prevenir daños graves.

| Señal de Alerta | Posible Causa y Acción Inmediata | Urgencia |
| :--- | :--- | :--- |
| **Luz de Aceite Encendida** 💡 | **Falta de presión/nivel de aceite.** Detén el motor *inmediatamente* de forma segura para evitar la destrucción del motor. | **¡MÁXIMA!** 🛑 |
| **Humo Azul/Grisáceo** 💨 | **Quema de aceite** (problemas de sellos o anillos). Requiere revisión profesional urgente. | **ALTA** ⚠️ |
| **Humo Blanco Excesivo** ☁️ | **Quema de refrigerante/agua.** Posible junta de culata dañada. Detén el vehículo y apaga el motor para evitar daños por calor. | **ALTA** ⚠️ |
| **Ruido de Golpeteo Fuerte** 🔨 | **Fallo interno mayor** (bielas, pistones). No uses el vehículo. Llama a una grúa. | **¡MÁXIMA!** 🛑 |
| **Motor se Sobrecalienta** 🔥 | **Falla del sistema de enfriamiento.** Detén el vehículo y apaga el motor para evitar daños por calor. | **¡MÁXIMA!** 🛑 |

Si experimentas una alerta, por favor, **escribe el síntoma específico** que estás viendo (ej. "sale humo azul") y te diré qué hacer."#;
