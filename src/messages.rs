//! Fixed bilingual (English / Hindi) user-facing messages.

pub(crate) const BAD_REQUEST: &str =
    "Please provide valid information. / कृपया सही जानकारी प्रदान करें।";
pub(crate) const UNAUTHORIZED: &str =
    "You are not authorized to perform this action. / आप यह कार्य करने के लिए अधिकृत नहीं हैं।";
pub(crate) const FORBIDDEN: &str =
    "You do not have permission to access this. / आपको इसकी अनुमति नहीं है।";
pub(crate) const NOT_FOUND: &str =
    "The requested data was not found. / अनुरोधित डेटा नहीं मिला।";
pub(crate) const SERVER_ERROR: &str =
    "Server error, please try again later. / सर्वर त्रुटि, कृपया बाद में पुनः प्रयास करें।";
pub(crate) const UNKNOWN: &str =
    "Something went wrong, please try again. / कुछ गलत हो गया, कृपया पुनः प्रयास करें।";
pub(crate) const NETWORK: &str =
    "Please check your internet connection. / कृपया अपना इंटरनेट कनेक्शन जांचें।";
pub(crate) const TIMEOUT: &str =
    "The request took too long, please try again. / अनुरोध में बहुत समय लगा, कृपया पुनः प्रयास करें।";
pub(crate) const INVALID_REQUEST: &str =
    "The request could not be prepared. / अनुरोध तैयार नहीं किया जा सका।";
